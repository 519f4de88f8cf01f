//! AI assistance for an interactive debugger.
//!
//! The crate sits between a debugger REPL and its command dispatcher. Every
//! input line is either passed through untouched or turned into a question
//! for an AI agent, whose replies can queue debugger commands and keep
//! stepping on their own for a bounded number of turns.
//!
//! - **[`core`]**: Pure logic (line classification, trigger flag, command
//!   queue, auto-continue state machine). No I/O.
//! - **[`io`]**: Config files, child processes, context rendering, the agent
//!   client and its tools.
//! - **[`session`]**: The interception layer that ties them together.
//! - **[`debugger`]**: A small script debugger to attach the layer to.

pub mod core;
pub mod debugger;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod repl;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
