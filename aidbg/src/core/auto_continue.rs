//! Bounded auto-continuation state machine.
//!
//! States are `Idle` (flag clear), `Armed` (flag set by an AI turn) and a
//! transient `Exhausted` that resets straight back to `Idle`. The counter
//! tracks consecutive armed wait cycles and never exceeds `limit + 1`.

/// Default cap on consecutive unattended continuation turns.
pub const MAX_AUTO_CONTINUE: u32 = 20;

/// What the controller should do for one wait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    /// Not armed; block for human input.
    Passthrough,
    /// Armed and under the limit; run continuation turn number `iteration`.
    Continue { iteration: u32 },
    /// Armed but over the limit; the flag and counter have been reset.
    Exhausted { limit: u32 },
}

/// Auto-continue flag plus its consecutive-cycle counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoContinue {
    armed: bool,
    counter: u32,
    limit: u32,
}

impl Default for AutoContinue {
    fn default() -> Self {
        Self::new(MAX_AUTO_CONTINUE)
    }
}

impl AutoContinue {
    pub fn new(limit: u32) -> Self {
        Self {
            armed: false,
            counter: 0,
            limit,
        }
    }

    /// Request one more automated turn before the next human prompt.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Force the flag clear. The counter is left to the next cycle.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Advance the state machine at the start of a wait cycle.
    ///
    /// A `Continue` decision clears the flag; the continuation turn must
    /// re-arm it to keep the loop going.
    pub fn begin_cycle(&mut self) -> CycleDecision {
        if !self.armed {
            self.counter = 0;
            return CycleDecision::Passthrough;
        }
        self.counter += 1;
        if self.counter > self.limit {
            self.armed = false;
            self.counter = 0;
            return CycleDecision::Exhausted { limit: self.limit };
        }
        self.armed = false;
        CycleDecision::Continue {
            iteration: self.counter,
        }
    }
}
