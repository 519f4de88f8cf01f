//! FIFO buffer of debugger commands produced by an AI turn.

use std::collections::VecDeque;

/// Ordered, single-consumer queue of commands awaiting replay.
///
/// [`take_all`](Self::take_all) hands back a snapshot and leaves the queue
/// empty, so anything enqueued while the snapshot is replayed waits for the
/// next drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCommandQueue {
    commands: VecDeque<String>,
}

impl PendingCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: impl Into<String>) {
        self.commands.push_back(command.into());
    }

    /// Remove and return every queued command in enqueue order.
    pub fn take_all(&mut self) -> Vec<String> {
        self.commands.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_all_preserves_order_and_empties() {
        let mut queue = PendingCommandQueue::new();
        queue.push("next");
        queue.push("print x".to_string());

        assert_eq!(queue.take_all(), vec!["next", "print x"]);
        assert!(queue.is_empty());
        assert!(queue.take_all().is_empty());
    }

    #[test]
    fn pushes_after_take_land_in_next_snapshot() {
        let mut queue = PendingCommandQueue::new();
        queue.push("a");
        let first = queue.take_all();
        queue.push("b");

        assert_eq!(first, vec!["a"]);
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(queue.len(), 1);
    }
}
