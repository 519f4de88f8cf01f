//! The only handle an AI turn has on session state.

use crate::core::auto_continue::AutoContinue;
use crate::core::queue::PendingCommandQueue;

/// Borrowed view of the session state an AI turn is allowed to change.
pub struct TurnEffects<'a> {
    pending: &'a mut PendingCommandQueue,
    auto_continue: &'a mut AutoContinue,
}

impl<'a> TurnEffects<'a> {
    pub fn new(pending: &'a mut PendingCommandQueue, auto_continue: &'a mut AutoContinue) -> Self {
        Self {
            pending,
            auto_continue,
        }
    }

    /// Queue a debugger command for replay once the turn finishes.
    pub fn add_pending_debug_command(&mut self, command: impl Into<String>) {
        self.pending.push(command);
    }

    /// Ask for another automated turn before the next human prompt.
    pub fn request_auto_continue(&mut self) {
        self.auto_continue.arm();
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn auto_continue_requested(&self) -> bool {
        self.auto_continue.is_armed()
    }
}
