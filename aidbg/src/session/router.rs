//! Per-line routing between AI turns and the host dispatcher.

use std::io::Write;

use tracing::{debug, info, instrument};

use super::{DebugHost, Session};
use crate::core::classifier::{LineRoute, classify_line};
use crate::core::types::Signal;
use crate::io::ai_client::AiClient;
use crate::io::context::ContextBuilder;

impl<B: ContextBuilder, A: AiClient, W: Write> Session<B, A, W> {
    /// Classify and fully handle one input line.
    ///
    /// Consumes the trigger flag whatever the outcome. AI-directed lines never
    /// reach the host; their turn's queued commands are replayed before this
    /// returns.
    #[instrument(skip_all)]
    pub fn route<H: DebugHost>(&mut self, host: &mut H, line: &str) -> Signal {
        let triggered = self.state.trigger().take();
        let route = classify_line(line, triggered);
        debug!(route = route.label(), triggered, "classified line");

        match route {
            LineRoute::Delegate => host.dispatch(line),
            LineRoute::Absorb(source) => {
                debug!(?source, "empty AI question absorbed");
                Signal::Retry
            }
            LineRoute::Ask { question, source } => {
                debug!(?source, "routing line to AI");
                self.ask(&*host, &question);
                self.drain_and_replay(host)
            }
        }
    }

    /// Replay every queued command through the host, in order.
    ///
    /// The queue is emptied up front; commands queued during replay wait for
    /// the next drain. Stops at the first non-`Retry` signal and returns it.
    pub(crate) fn drain_and_replay<H: DebugHost>(&mut self, host: &mut H) -> Signal {
        let commands = self.state.pending_mut().take_all();
        if commands.is_empty() {
            return Signal::Retry;
        }
        info!(queued = commands.len(), "replaying queued commands");

        for (idx, command) in commands.iter().enumerate() {
            self.notice(format!("> {command}"));
            let signal = host.dispatch(command);
            if !signal.is_retry() {
                info!(
                    command = %command,
                    ?signal,
                    skipped = commands.len() - idx - 1,
                    "replay stopped by host"
                );
                return signal;
            }
        }
        Signal::Retry
    }
}
