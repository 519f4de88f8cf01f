//! AI question handling: resolve the frame, build context, ask, contain errors.

use std::io::Write;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{DebugHost, Session};
use crate::core::types::TurnKind;
use crate::io::ai_client::{AiClient, AskError};
use crate::io::context::ContextBuilder;

/// Synthetic question for automated follow-up turns.
pub const CONTINUATION_PROMPT: &str =
    "The previously requested debug command has executed. Analyze the new state and continue.";

/// Lines of the error source chain shown when verbose.
const TRACE_DEPTH: usize = 3;

/// Why a turn did not complete.
#[derive(Debug, Error)]
pub enum TurnError {
    /// No program is paused, so there is nothing to ask about.
    #[error("no current frame available")]
    NoFrame,
    #[error("{0}")]
    Configuration(String),
    #[error(transparent)]
    Failure(anyhow::Error),
}

impl From<AskError> for TurnError {
    fn from(err: AskError) -> Self {
        match err {
            AskError::Configuration(message) => TurnError::Configuration(message),
            AskError::Failure(err) => TurnError::Failure(err),
        }
    }
}

impl<B: ContextBuilder, A: AiClient, W: Write> Session<B, A, W> {
    /// Run one human-initiated turn and report any failure.
    pub(crate) fn ask<H: DebugHost>(&mut self, host: &H, question: &str) {
        if let Err(err) = self.run_turn(host, TurnKind::Question, question) {
            self.report(TurnKind::Question, &err);
        }
    }

    /// Run one automated continuation turn and report any failure.
    pub(crate) fn ask_continuation<H: DebugHost>(&mut self, host: &H) {
        if let Err(err) = self.run_turn(host, TurnKind::Continuation, CONTINUATION_PROMPT) {
            self.report(TurnKind::Continuation, &err);
        }
    }

    #[instrument(skip_all, fields(kind = kind.as_str()))]
    fn run_turn<H: DebugHost>(
        &mut self,
        host: &H,
        kind: TurnKind,
        question: &str,
    ) -> Result<(), TurnError> {
        let frame = host.current_frame().ok_or(TurnError::NoFrame)?;
        let payload = self.builder.build(&frame).map_err(TurnError::Failure)?;
        info!(location = %payload.location, "starting AI turn");

        let mut effects = self.state.effects();
        self.client.ask(kind, question, &payload, &frame, &mut effects)?;

        debug!(
            queued = self.state.pending().len(),
            auto_continue = self.state.auto_continue().is_armed(),
            "AI turn finished"
        );
        Ok(())
    }

    fn report(&mut self, kind: TurnKind, err: &TurnError) {
        warn!(kind = kind.as_str(), err = %err, "AI turn failed");
        match err {
            TurnError::NoFrame => self.notice(format!("Error: {err}")),
            TurnError::Configuration(message) => self.notice(message),
            TurnError::Failure(inner) => {
                self.notice(format!("Error: {err}"));
                if self.verbose {
                    for cause in inner.chain().skip(1).take(TRACE_DEPTH) {
                        self.notice(format!("  caused by: {cause}"));
                    }
                }
            }
        }

        // Unexplained failures always stop the loop. A continuation turn also
        // stops it on missing-frame and configuration errors.
        let disarm = kind == TurnKind::Continuation || matches!(err, TurnError::Failure(_));
        if disarm {
            if self.state.auto_continue().is_armed() {
                info!("auto-continue disabled after failure");
            }
            self.state.auto_continue_mut().disarm();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionOptions;
    use crate::test_support::{ScriptedHost, ScriptedTurn, printed, scripted_session};

    #[test]
    fn missing_frame_skips_builder_and_client() {
        let mut session = scripted_session(vec![], SessionOptions::default());
        let host = ScriptedHost::without_frame();

        session.ask(&host, "why?");

        assert!(printed(&session).contains("[aidbg] Error: no current frame available"));
        assert_eq!(session.builder().builds(), 0);
        assert!(session.client().calls.is_empty());
    }

    #[test]
    fn configuration_error_prints_message_only() {
        let mut session = scripted_session(
            vec![ScriptedTurn::ConfigError("Set [agent].command".to_string())],
            SessionOptions {
                verbose: true,
                ..SessionOptions::default()
            },
        );
        session.state_mut().auto_continue_mut().arm();

        session.ask(&ScriptedHost::paused(), "why?");

        assert_eq!(printed(&session), "[aidbg] Set [agent].command\n");
        assert!(session.state().auto_continue().is_armed());
    }

    #[test]
    fn failure_hides_chain_unless_verbose() {
        let mut quiet = scripted_session(
            vec![ScriptedTurn::fail("agent broke")],
            SessionOptions::default(),
        );
        quiet.ask(&ScriptedHost::paused(), "why?");
        assert_eq!(printed(&quiet), "[aidbg] Error: agent broke\n");

        let mut loud = scripted_session(
            vec![ScriptedTurn::fail("agent broke")],
            SessionOptions {
                verbose: true,
                ..SessionOptions::default()
            },
        );
        loud.ask(&ScriptedHost::paused(), "why?");
        let out = printed(&loud);
        assert!(out.contains("[aidbg]   caused by: middle layer"));
        assert!(out.contains("[aidbg]   caused by: root cause"));
    }

    #[test]
    fn question_failure_disarms_auto_continue() {
        let mut session =
            scripted_session(vec![ScriptedTurn::fail("boom")], SessionOptions::default());
        session.ask(&ScriptedHost::paused(), "why?");
        assert!(!session.state().auto_continue().is_armed());
    }

    #[test]
    fn question_without_frame_leaves_auto_continue_alone() {
        let mut session = scripted_session(vec![], SessionOptions::default());
        session.state_mut().auto_continue_mut().arm();
        session.ask(&ScriptedHost::without_frame(), "why?");
        assert!(session.state().auto_continue().is_armed());
    }

    #[test]
    fn continuation_failure_disarms() {
        let mut session =
            scripted_session(vec![ScriptedTurn::fail("boom")], SessionOptions::default());
        session.ask_continuation(&ScriptedHost::paused());
        assert!(!session.state().auto_continue().is_armed());
        assert_eq!(printed(&session), "[aidbg] Error: boom\n");
    }

    #[test]
    fn continuation_configuration_error_disarms() {
        let mut session = scripted_session(
            vec![ScriptedTurn::ConfigError("not configured".to_string())],
            SessionOptions::default(),
        );
        session.state_mut().auto_continue_mut().arm();

        session.ask_continuation(&ScriptedHost::paused());

        assert!(!session.state().auto_continue().is_armed());
        assert_eq!(
            session.client().calls,
            vec![(TurnKind::Continuation, CONTINUATION_PROMPT.to_string())]
        );
    }
}
