//! Auto-continuation before each wait for input.

use std::io::Write;

use tracing::{info, instrument};

use super::{DebugHost, Session};
use crate::core::auto_continue::CycleDecision;
use crate::core::types::Signal;
use crate::io::ai_client::AiClient;
use crate::io::context::ContextBuilder;

impl<B: ContextBuilder, A: AiClient, W: Write> Session<B, A, W> {
    /// Run at most one continuation turn before the REPL blocks for input.
    ///
    /// Returns `None` when the REPL should prompt the human as usual, or the
    /// signal to act on instead of reading a line.
    #[instrument(skip_all)]
    pub fn pre_wait<H: DebugHost>(&mut self, host: &mut H) -> Option<Signal> {
        match self.state.auto_continue_mut().begin_cycle() {
            CycleDecision::Passthrough => None,
            CycleDecision::Exhausted { limit } => {
                info!(limit, "auto-continue limit reached");
                self.notice(format!(
                    "Auto-continue limit ({limit}) reached; waiting for input."
                ));
                Some(Signal::Retry)
            }
            CycleDecision::Continue { iteration } => {
                let limit = self.state.auto_continue().limit();
                info!(iteration, limit, "running continuation turn");
                self.notice(format!("Auto-continue ({iteration}/{limit})"));
                self.ask_continuation(&*host);
                Some(self.drain_and_replay(host))
            }
        }
    }
}
