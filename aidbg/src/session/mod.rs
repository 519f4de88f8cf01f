//! The interception layer between the REPL and the host debugger.
//!
//! A [`Session`] owns the mutable session state and its collaborators. The
//! REPL calls [`Session::pre_wait`] before blocking for input and
//! [`Session::route`] for every line it reads. The host's own dispatcher is
//! only reached through [`DebugHost::dispatch`], for delegated lines and for
//! replay of queued commands.

mod controller;
mod handler;
mod router;
mod state;

use std::fmt::Display;
use std::io::Write;

use tracing::warn;

use crate::core::auto_continue::MAX_AUTO_CONTINUE;
use crate::core::trigger::TriggerFlag;
use crate::core::types::{Frame, Signal};
use crate::io::config::AidbgConfig;

pub use handler::{CONTINUATION_PROMPT, TurnError};
pub use state::SessionState;

/// Prefix on every message the layer prints.
pub const MESSAGE_PREFIX: &str = "[aidbg]";

/// The debugger the layer is attached to.
pub trait DebugHost {
    /// Where execution is paused, or `None` when no program is running.
    fn current_frame(&self) -> Option<Frame>;

    /// Run one debugger command exactly as typed.
    fn dispatch(&mut self, line: &str) -> Signal;
}

/// Knobs that shape a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Show error source chains with turn failures.
    pub verbose: bool,
    pub auto_continue_limit: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            auto_continue_limit: MAX_AUTO_CONTINUE,
        }
    }
}

impl SessionOptions {
    pub fn from_config(cfg: &AidbgConfig) -> Self {
        Self {
            verbose: cfg.debug,
            auto_continue_limit: cfg.auto_continue_limit,
        }
    }
}

/// Session state plus the collaborators an AI turn needs.
pub struct Session<B, A, W> {
    state: SessionState,
    builder: B,
    client: A,
    out: W,
    verbose: bool,
}

impl<B, A, W: Write> Session<B, A, W> {
    pub fn new(builder: B, client: A, out: W, options: SessionOptions) -> Self {
        Self {
            state: SessionState::new(options.auto_continue_limit),
            builder,
            client,
            out,
            verbose: options.verbose,
        }
    }

    /// Handle for the key binding that marks the next line as an AI question.
    pub fn trigger(&self) -> TriggerFlag {
        self.state.trigger().clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn client(&self) -> &A {
        &self.client
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn print_banner(&mut self) {
        self.notice("AI assistant loaded. Use 'ai <question>' or Ctrl+Space.");
    }

    fn notice(&mut self, message: impl Display) {
        if let Err(err) = writeln!(self.out, "{MESSAGE_PREFIX} {message}") {
            warn!(err = %err, "failed to write session message");
        }
    }
}
