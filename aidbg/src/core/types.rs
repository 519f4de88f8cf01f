//! Shared types for the interception layer.
//!
//! These types define stable contracts between the router, the AI turn
//! handler and the debugger host. They carry no I/O.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Control signal returned to the REPL after a line (or a wait cycle) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The line was consumed; stay at the prompt and read the next line.
    Retry,
    /// The host asked to end the debugging session.
    Quit,
}

impl Signal {
    pub fn is_retry(self) -> bool {
        matches!(self, Signal::Retry)
    }
}

/// Which pipeline an AI turn runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// A human-supplied question.
    Question,
    /// An automated follow-up turn started by the auto-continue controller.
    Continuation,
}

impl TurnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnKind::Question => "question",
            TurnKind::Continuation => "continuation",
        }
    }
}

/// Snapshot of where execution is paused right now.
///
/// Obtained from the host for each turn and dropped when the turn ends; the
/// paused position can move between turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source file being debugged.
    pub path: PathBuf,
    /// Current line, 1-indexed.
    pub line: usize,
    /// Full source of `path`, one entry per physical line.
    pub source: Vec<String>,
    /// Variables visible at the current position.
    pub variables: BTreeMap<String, String>,
    /// Lines (1-indexed) carrying a breakpoint, ascending.
    pub breakpoints: Vec<usize>,
}

impl Frame {
    /// `path:line` label for messages and prompts.
    pub fn location(&self) -> String {
        format!("{}:{}", self.path.display(), self.line)
    }

    /// Text of the current line, if it exists.
    pub fn current_line(&self) -> Option<&str> {
        self.line
            .checked_sub(1)
            .and_then(|idx| self.source.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(line: usize) -> Frame {
        Frame {
            path: PathBuf::from("demo.bat"),
            line,
            source: vec!["set a=1".to_string(), "echo %a%".to_string()],
            variables: BTreeMap::new(),
            breakpoints: Vec::new(),
        }
    }

    #[test]
    fn current_line_is_one_indexed() {
        assert_eq!(frame(2).current_line(), Some("echo %a%"));
        assert_eq!(frame(0).current_line(), None);
        assert_eq!(frame(3).current_line(), None);
    }

    #[test]
    fn location_joins_path_and_line() {
        assert_eq!(frame(1).location(), "demo.bat:1");
    }
}
