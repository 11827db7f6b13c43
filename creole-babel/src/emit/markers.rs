//! List marker accumulator
//!
//! Text backends derive a list item's marker and indentation from the chain of lists that
//! encloses it. Entering a list pushes that list's marker, leaving pops it, so the stack
//! length always equals the current list depth.

#[derive(Debug, Clone, Default)]
pub struct MarkerStack {
    markers: Vec<String>,
}

impl MarkerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: impl Into<String>) {
        self.markers.push(marker.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.markers.pop()
    }

    pub fn depth(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Every marker concatenated, e.g. `**#` for Creole and Textile items.
    pub fn joined(&self) -> String {
        self.markers.concat()
    }

    /// The innermost marker.
    pub fn current(&self) -> &str {
        self.markers.last().map(String::as_str).unwrap_or("")
    }

    /// Spaces covering the markers of every enclosing list, each followed by one space.
    ///
    /// This is the indentation Markdown and reST need to nest a list under an item.
    pub fn indent(&self) -> String {
        let width: usize = self
            .markers
            .iter()
            .take(self.markers.len().saturating_sub(1))
            .map(|marker| marker.chars().count() + 1)
            .sum();
        " ".repeat(width)
    }
}
