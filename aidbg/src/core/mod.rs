//! Deterministic, pure logic shared by the interception layer.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod auto_continue;
pub mod classifier;
pub mod effects;
pub mod queue;
pub mod trigger;
pub mod types;
