//! Scripted collaborators for driving a session without a real debugger or agent.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::core::effects::TurnEffects;
use crate::core::types::{Frame, Signal, TurnKind};
use crate::debugger::script::Script;
use crate::io::ai_client::{AiClient, AskError};
use crate::io::context::{ContextBuilder, ContextPayload};
use crate::session::{DebugHost, Session, SessionOptions};

/// Session wired to scripted collaborators, printing into a buffer.
pub type ScriptedSession = Session<StaticContextBuilder, ScriptedAiClient, Vec<u8>>;

/// Build a [`ScriptedSession`] that plays `turns` in order.
pub fn scripted_session(turns: Vec<ScriptedTurn>, options: SessionOptions) -> ScriptedSession {
    Session::new(
        StaticContextBuilder::default(),
        ScriptedAiClient::new(turns),
        Vec::new(),
        options,
    )
}

/// Everything the session printed so far.
pub fn printed(session: &ScriptedSession) -> String {
    String::from_utf8_lossy(session.output()).into_owned()
}

/// A small deterministic frame paused on line 2 of a three-line script.
pub fn sample_frame() -> Frame {
    Frame {
        path: PathBuf::from("demo.bat"),
        line: 2,
        source: vec![
            "set x=1".to_string(),
            "echo %x%".to_string(),
            "set x=2".to_string(),
        ],
        variables: BTreeMap::from([("x".to_string(), "1".to_string())]),
        breakpoints: vec![3],
    }
}

/// Write `contents` to `demo.bat` in a fresh temp dir and load it.
///
/// Keep the returned dir alive for as long as the script path is used.
pub fn temp_script(contents: &str) -> (tempfile::TempDir, Script) {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("demo.bat");
    std::fs::write(&path, contents).expect("write script");
    let script = Script::load(&path).expect("load script");
    (temp, script)
}

/// Host that records dispatched lines and answers with scripted signals.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    frame: Option<Frame>,
    signals: HashMap<String, Signal>,
    pub dispatched: Vec<String>,
    frame_requests: Cell<usize>,
}

impl ScriptedHost {
    /// Host paused at [`sample_frame`].
    pub fn paused() -> Self {
        Self {
            frame: Some(sample_frame()),
            ..Self::default()
        }
    }

    /// Host with no running program.
    pub fn without_frame() -> Self {
        Self::default()
    }

    /// Make `command` answer with `signal` instead of `Retry`.
    pub fn with_signal(mut self, command: &str, signal: Signal) -> Self {
        self.signals.insert(command.to_string(), signal);
        self
    }

    pub fn frame_requests(&self) -> usize {
        self.frame_requests.get()
    }
}

impl DebugHost for ScriptedHost {
    fn current_frame(&self) -> Option<Frame> {
        self.frame_requests.set(self.frame_requests.get() + 1);
        self.frame.clone()
    }

    fn dispatch(&mut self, line: &str) -> Signal {
        self.dispatched.push(line.to_string());
        self.signals.get(line).copied().unwrap_or(Signal::Retry)
    }
}

/// Context builder that renders only the location and counts its calls.
#[derive(Debug, Default)]
pub struct StaticContextBuilder {
    builds: Cell<usize>,
}

impl StaticContextBuilder {
    pub fn builds(&self) -> usize {
        self.builds.get()
    }
}

impl ContextBuilder for StaticContextBuilder {
    fn build(&self, frame: &Frame) -> Result<ContextPayload> {
        self.builds.set(self.builds.get() + 1);
        Ok(ContextPayload {
            location: frame.location(),
            source: frame.current_line().unwrap_or_default().to_string(),
            variables: Vec::new(),
            breakpoints: frame.breakpoints.clone(),
        })
    }
}

/// One scripted AI turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedTurn {
    /// Succeed after queueing `commands` and optionally requesting auto-continue.
    Reply {
        commands: Vec<String>,
        keep_going: bool,
    },
    /// Fail with a configuration error.
    ConfigError(String),
    /// Request auto-continue and queue `commands`, then fail.
    FailAfter {
        commands: Vec<String>,
        message: String,
    },
}

impl ScriptedTurn {
    pub fn answer() -> Self {
        Self::commands(&[])
    }

    pub fn commands(commands: &[&str]) -> Self {
        Self::Reply {
            commands: commands.iter().map(|c| c.to_string()).collect(),
            keep_going: false,
        }
    }

    pub fn continuing(commands: &[&str]) -> Self {
        Self::Reply {
            commands: commands.iter().map(|c| c.to_string()).collect(),
            keep_going: true,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self::FailAfter {
            commands: Vec::new(),
            message: message.to_string(),
        }
    }
}

/// AI client that plays back [`ScriptedTurn`]s and records every call.
///
/// Once the script runs out, every further turn is a plain answer.
#[derive(Debug, Default)]
pub struct ScriptedAiClient {
    turns: VecDeque<ScriptedTurn>,
    pub calls: Vec<(TurnKind, String)>,
}

impl ScriptedAiClient {
    pub fn new(turns: Vec<ScriptedTurn>) -> Self {
        Self {
            turns: turns.into(),
            calls: Vec::new(),
        }
    }

    pub fn questions(&self) -> Vec<&str> {
        self.calls.iter().map(|(_, q)| q.as_str()).collect()
    }
}

impl AiClient for ScriptedAiClient {
    fn ask(
        &mut self,
        kind: TurnKind,
        question: &str,
        _context: &ContextPayload,
        _frame: &Frame,
        effects: &mut TurnEffects<'_>,
    ) -> Result<(), AskError> {
        self.calls.push((kind, question.to_string()));
        match self.turns.pop_front().unwrap_or_else(ScriptedTurn::answer) {
            ScriptedTurn::Reply {
                commands,
                keep_going,
            } => {
                for command in commands {
                    effects.add_pending_debug_command(command);
                }
                if keep_going {
                    effects.request_auto_continue();
                }
                Ok(())
            }
            ScriptedTurn::ConfigError(message) => Err(AskError::Configuration(message)),
            ScriptedTurn::FailAfter { commands, message } => {
                for command in commands {
                    effects.add_pending_debug_command(command);
                }
                effects.request_auto_continue();
                Err(AskError::Failure(
                    anyhow!("root cause").context("middle layer").context(message),
                ))
            }
        }
    }
}
