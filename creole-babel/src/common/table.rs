//! Column layout for text tables
//!
//! Creole, reST grid tables and Markdown pipe tables all pad cells to a common column width.
//! A backend renders each cell's inline content first, collects the results here, then lays
//! the table out with [`TextTable::widths`].

/// A rendered cell. Text may span several lines (reST cells with line breaks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub head: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>, head: bool) -> Self {
        Self {
            text: text.into(),
            head,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.text.is_empty() {
            vec![""]
        } else {
            self.text.lines().collect()
        }
    }

    pub fn width(&self) -> usize {
        self.lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextTable {
    rows: Vec<Vec<Cell>>,
}

impl TextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether the first row consists of head cells only.
    pub fn has_header(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| !row.is_empty() && row.iter().all(|cell| cell.head))
    }

    /// Widest cell per column, never below `min`.
    pub fn widths(&self, min: usize) -> Vec<usize> {
        let mut widths = vec![min; self.column_count()];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }
}

/// Left-align `text` in `width` columns.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = String::with_capacity(text.len() + width.saturating_sub(len));
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}
