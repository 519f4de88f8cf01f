//! Deterministic classification of REPL input lines.
//!
//! Order matters and is fixed:
//!
//! 1. A consumed trigger flag makes the whole line an AI question.
//! 2. The literal `"ai "` prefix makes the remainder an AI question.
//! 3. Any byte outside 7-bit ASCII makes the line an AI question.
//! 4. Everything else is delegated to the host dispatcher untouched.
//!
//! Rule 3 also fires on legitimate commands with non-ASCII arguments (for
//! example a string literal in a `print`). It is kept as a known false-positive
//! source rather than narrowed.

/// Explicit textual trigger for an AI question.
pub const AI_PREFIX: &str = "ai ";

/// Why a line was treated as an AI question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskSource {
    Trigger,
    Prefix,
    NonAscii,
}

/// Routing decision for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRoute {
    /// Run an AI turn with this trimmed, non-empty question.
    Ask { question: String, source: AskSource },
    /// AI-directed but empty after trimming; consume silently.
    Absorb(AskSource),
    /// Not ours; pass the line unmodified to the host.
    Delegate,
}

impl LineRoute {
    pub fn label(&self) -> &'static str {
        match self {
            LineRoute::Ask { .. } => "ask",
            LineRoute::Absorb(_) => "absorb",
            LineRoute::Delegate => "delegate",
        }
    }
}

/// Classify `line`. `triggered` is the already-consumed trigger flag.
pub fn classify_line(line: &str, triggered: bool) -> LineRoute {
    if triggered {
        return ask_or_absorb(line, AskSource::Trigger);
    }
    if let Some(rest) = line.strip_prefix(AI_PREFIX) {
        return ask_or_absorb(rest, AskSource::Prefix);
    }
    if !line.is_ascii() {
        return ask_or_absorb(line, AskSource::NonAscii);
    }
    LineRoute::Delegate
}

fn ask_or_absorb(text: &str, source: AskSource) -> LineRoute {
    let question = text.trim();
    if question.is_empty() {
        LineRoute::Absorb(source)
    } else {
        LineRoute::Ask {
            question: question.to_string(),
            source,
        }
    }
}
