//! Side-effecting collaborators of the interception layer.

pub mod ai_client;
pub mod config;
pub mod context;
pub mod init;
pub mod process;
pub mod prompt;
pub mod tools;
