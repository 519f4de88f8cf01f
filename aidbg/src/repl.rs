//! The interactive loop: read a line, route it, repeat.
//!
//! Before every blocking read the session gets a chance to run an automated
//! continuation turn. Ctrl+Space marks the line being typed as an AI question
//! and submits it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{
    Cmd, CompletionType, ConditionalEventHandler, Config as RustylineConfig, EditMode, Editor,
    Event, EventContext, EventHandler, KeyCode, KeyEvent, Modifiers, RepeatCount,
};
use tracing::{debug, warn};

use crate::core::trigger::TriggerFlag;
use crate::core::types::Signal;
use crate::io::ai_client::AiClient;
use crate::io::context::ContextBuilder;
use crate::session::{DebugHost, Session};

pub const PROMPT: &str = "(aidbg) ";

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl+C: drop the current line.
    Interrupted,
    /// Ctrl+D or end of input.
    Eof,
}

/// Source of input lines for [`run`].
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;
}

/// Drive `session` and `host` until the host quits or input ends.
pub fn run<B, A, W, H, R>(
    session: &mut Session<B, A, W>,
    host: &mut H,
    reader: &mut R,
) -> Result<()>
where
    B: ContextBuilder,
    A: AiClient,
    W: std::io::Write,
    H: DebugHost,
    R: LineReader,
{
    loop {
        if let Some(signal) = session.pre_wait(host) {
            if signal == Signal::Quit {
                debug!("host quit during auto-continue");
                return Ok(());
            }
            continue;
        }

        let line = match reader.read_line(PROMPT)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => continue,
            ReadOutcome::Eof => {
                debug!("end of input");
                return Ok(());
            }
        };
        if session.route(host, &line) == Signal::Quit {
            return Ok(());
        }
    }
}

/// Sets the trigger flag and submits the line.
struct AskKey(TriggerFlag);

impl ConditionalEventHandler for AskKey {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        self.0.set();
        Some(Cmd::AcceptLine)
    }
}

/// [`LineReader`] over a rustyline editor with persistent history.
pub struct EditorReader {
    editor: Editor<(), FileHistory>,
    history: Option<PathBuf>,
}

impl EditorReader {
    /// `history` is loaded now and written back by [`EditorReader::save_history`].
    pub fn new(trigger: TriggerFlag, history: Option<PathBuf>) -> Result<Self> {
        let config = RustylineConfig::builder()
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(true)
            .build();
        let mut editor: Editor<(), FileHistory> =
            Editor::with_config(config).context("create line editor")?;

        // Terminals report Ctrl+Space in different ways.
        for key in [
            KeyEvent(KeyCode::Char(' '), Modifiers::CTRL),
            KeyEvent(KeyCode::Char('@'), Modifiers::CTRL),
            KeyEvent(KeyCode::Null, Modifiers::NONE),
        ] {
            editor.bind_sequence(
                key,
                EventHandler::Conditional(Box::new(AskKey(trigger.clone()))),
            );
        }

        if let Some(path) = &history
            && let Err(err) = editor.load_history(path)
        {
            debug!(path = %path.display(), err = %err, "no history loaded");
        }
        Ok(Self { editor, history })
    }

    pub fn save_history(&mut self) {
        let Some(path) = &self.history else {
            return;
        };
        if let Err(err) = self.editor.save_history(path) {
            warn!(path = %path.display(), err = %err, "failed to save history");
        }
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err).context("read input line"),
        }
    }
}
