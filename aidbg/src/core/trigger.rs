//! One-shot "next line is an AI question" flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared one-shot flag set by a key event and consumed by the router.
///
/// Clones share the same flag: the line editor keeps one to set it from the
/// key handler, the session keeps another to consume it.
#[derive(Debug, Clone, Default)]
pub struct TriggerFlag {
    armed: Arc<AtomicBool>,
}

impl TriggerFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Read and clear in one step.
    pub fn take(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}
