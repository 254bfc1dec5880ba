//! Word document model.

use serde::{Deserialize, Serialize};

/// A table cell with its plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCell {
    /// Cell text; paragraphs are joined with `\n`.
    pub text: String,
}

impl WordCell {
    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRow {
    /// Cells in grid order. Merged cells appear once per grid column.
    pub cells: Vec<WordCell>,
}

impl WordRow {
    /// Create a row from cell texts.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(WordCell::with_text).collect(),
        }
    }
}

/// A body-level table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTable {
    /// Rows in document order.
    pub rows: Vec<WordRow>,
}

impl WordTable {
    /// Create a table from rows of cell texts.
    pub fn from_rows<R, I, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(WordRow::from_texts).collect(),
        }
    }
}

/// An in-memory Word document: body paragraphs and body tables.
///
/// Paragraphs and tables are kept as two independent sequences;
/// their relative position in the body is not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDocument {
    /// Text of every body paragraph, including empty ones.
    pub paragraphs: Vec<String>,
    /// Body tables in document order.
    pub tables: Vec<WordTable>,
}

impl WordDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.paragraphs.push(text.into());
    }

    /// Append a table.
    pub fn add_table(&mut self, table: WordTable) {
        self.tables.push(table);
    }
}
