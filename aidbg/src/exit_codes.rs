//! Stable exit codes for the aidbg CLI.

/// The session ended normally or `init` succeeded.
pub const OK: i32 = 0;
/// Invalid arguments, config, or script, or any other error.
pub const INVALID: i32 = 1;
