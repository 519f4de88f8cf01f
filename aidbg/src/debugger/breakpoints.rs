use std::collections::BTreeSet;

/// Breakpoint lines, 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakpoints {
    lines: BTreeSet<usize>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the line already had a breakpoint.
    pub fn add(&mut self, line: usize) -> bool {
        self.lines.insert(line)
    }

    /// Returns `false` if there was no breakpoint on the line.
    pub fn remove(&mut self, line: usize) -> bool {
        self.lines.remove(&line)
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Ascending.
    pub fn lines(&self) -> Vec<usize> {
        self.lines.iter().copied().collect()
    }
}
