//! Frame: the rows of text produced by one render pass.
//!
//! Widgets append rows to a [`Frame`] from their `render()` method. Rows are
//! fitted to the frame width at push time, so a committed frame never holds
//! text wider than its viewport. Chrome is clipped; content that must survive
//! intact is wrapped onto extra rows with [`Frame::push_wrapped`].

use std::fmt;

/// Rendered output of one pass over the component tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    rows: Vec<String>,
}

impl Frame {
    /// An empty frame `width` cells wide.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    /// Append one row, clipped to the frame width.
    pub fn push_row(&mut self, text: &str) {
        let clipped: String = text.chars().take(self.width).collect();
        self.rows.push(clipped);
    }

    /// Append every line of `text` as its own row.
    pub fn push_text(&mut self, text: &str) {
        for line in text.split('\n') {
            self.push_row(line);
        }
    }

    /// Append every line of `text`, breaking lines wider than the frame into
    /// width-sized rows. No character is dropped unless the width is zero.
    pub fn push_wrapped(&mut self, text: &str) {
        if self.width == 0 {
            self.push_text(text);
            return;
        }
        for line in text.split('\n') {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                self.push_blank();
                continue;
            }
            for chunk in chars.chunks(self.width) {
                self.rows.push(chunk.iter().collect());
            }
        }
    }

    /// Append an empty row.
    pub fn push_blank(&mut self) {
        self.rows.push(String::new());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.rows.iter().any(|row| row.contains(needle))
    }

    /// Rows joined with `'\n'`, each right-trimmed, no trailing newline.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
