//! The mutable state one debugging session carries between lines.

use crate::core::auto_continue::AutoContinue;
use crate::core::effects::TurnEffects;
use crate::core::queue::PendingCommandQueue;
use crate::core::trigger::TriggerFlag;

/// All mutable state of one debugging session.
///
/// Lives as long as the session; nothing here is reset except by the
/// transitions of the router and the auto-continue controller.
#[derive(Debug, Clone)]
pub struct SessionState {
    trigger: TriggerFlag,
    auto_continue: AutoContinue,
    pending: PendingCommandQueue,
}

impl SessionState {
    pub fn new(auto_continue_limit: u32) -> Self {
        Self {
            trigger: TriggerFlag::new(),
            auto_continue: AutoContinue::new(auto_continue_limit),
            pending: PendingCommandQueue::new(),
        }
    }

    pub fn trigger(&self) -> &TriggerFlag {
        &self.trigger
    }

    pub fn auto_continue(&self) -> &AutoContinue {
        &self.auto_continue
    }

    pub fn auto_continue_mut(&mut self) -> &mut AutoContinue {
        &mut self.auto_continue
    }

    pub fn pending(&self) -> &PendingCommandQueue {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingCommandQueue {
        &mut self.pending
    }

    pub fn effects(&mut self) -> TurnEffects<'_> {
        TurnEffects::new(&mut self.pending, &mut self.auto_continue)
    }
}
