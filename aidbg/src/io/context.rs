//! Context payload built from the paused execution position.

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::debug;

use crate::core::types::Frame;

/// What the AI sees about the current position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextPayload {
    /// `path:line` of the paused position.
    pub location: String,
    /// Numbered source window; the current line is marked with `=>`.
    pub source: String,
    /// Visible variables as `(name, value)`, sorted by name.
    pub variables: Vec<(String, String)>,
    /// Breakpoint lines, ascending.
    pub breakpoints: Vec<usize>,
}

/// Builds a [`ContextPayload`] for a frame. Implementations must not keep the frame.
pub trait ContextBuilder {
    fn build(&self, frame: &Frame) -> Result<ContextPayload>;
}

/// Context builder that shows a window of source around the current line.
#[derive(Debug, Clone)]
pub struct SourceContextBuilder {
    window: usize,
}

impl SourceContextBuilder {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl ContextBuilder for SourceContextBuilder {
    fn build(&self, frame: &Frame) -> Result<ContextPayload> {
        if frame.line == 0 || frame.line > frame.source.len() {
            return Err(anyhow!(
                "frame line {} outside {} ({} lines)",
                frame.line,
                frame.path.display(),
                frame.source.len()
            ));
        }
        let source = render_window(frame, self.window);
        debug!(location = %frame.location(), window = self.window, "built context payload");
        Ok(ContextPayload {
            location: frame.location(),
            source,
            variables: frame
                .variables
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            breakpoints: frame.breakpoints.clone(),
        })
    }
}

fn render_window(frame: &Frame, window: usize) -> String {
    let first = frame.line.saturating_sub(window).max(1);
    let last = (frame.line + window).min(frame.source.len());
    let width = last.to_string().len();

    let mut out = String::new();
    for number in first..=last {
        let marker = if number == frame.line { "=>" } else { "  " };
        let bp = if frame.breakpoints.contains(&number) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "{marker}{bp}{number:>width$}| {}\n",
            frame.source[number - 1]
        ));
    }
    out
}
