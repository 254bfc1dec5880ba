//! Normalized extraction output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// The kind of document being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Microsoft Word document (.docx)
    WordDocument,
    /// Microsoft PowerPoint presentation (.pptx)
    SlideDeck,
}

impl DocumentKind {
    /// Returns the file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::WordDocument => "docx",
            DocumentKind::SlideDeck => "pptx",
        }
    }

    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::WordDocument => "Word Document",
            DocumentKind::SlideDeck => "PowerPoint Presentation",
        }
    }

    /// Infer the kind from a file extension (case-insensitive).
    ///
    /// Returns [`Error::UnsupportedKind`] for anything other than
    /// `.docx` and `.pptx`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "docx" => Ok(DocumentKind::WordDocument),
            "pptx" => Ok(DocumentKind::SlideDeck),
            "" => Err(Error::UnsupportedKind(format!(
                "no file extension on {}",
                path.display()
            ))),
            other => Err(Error::UnsupportedKind(format!(".{}", other))),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" | "word-document" | "word_document" => Ok(DocumentKind::WordDocument),
            "pptx" | "slides" | "slide-deck" | "slide_deck" | "powerpoint" => {
                Ok(DocumentKind::SlideDeck)
            }
            _ => Err(Error::UnsupportedKind(s.to_string())),
        }
    }
}

/// A row of trimmed table cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values in column order; blank cells are empty strings.
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row from cell values.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One unit of extracted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Section {
    /// A non-blank Word paragraph.
    Paragraph {
        /// Zero-based position among all body paragraphs.
        index: usize,
        /// Original, untrimmed paragraph text.
        text: String,
    },
    /// A Word table.
    Table {
        /// Zero-based table position.
        index: usize,
        /// Rows with at least one non-blank cell.
        rows: Vec<Row>,
    },
    /// A slide of a presentation.
    Slide {
        /// Zero-based slide position.
        index: usize,
        /// Texts of shapes with non-blank text, in shape order.
        texts: Vec<String>,
    },
}

impl Section {
    /// The zero-based source index of this section.
    pub fn index(&self) -> usize {
        match self {
            Section::Paragraph { index, .. }
            | Section::Table { index, .. }
            | Section::Slide { index, .. } => *index,
        }
    }

    /// Check if this is a paragraph section.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Section::Paragraph { .. })
    }

    /// Check if this is a table section.
    pub fn is_table(&self) -> bool {
        matches!(self, Section::Table { .. })
    }

    /// Check if this is a slide section.
    pub fn is_slide(&self) -> bool {
        matches!(self, Section::Slide { .. })
    }
}

/// The normalized content of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Kind of the source document.
    pub kind: DocumentKind,

    /// Identifying string of the source; not interpreted.
    pub source_path: String,

    /// Extracted sections in source order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ExtractionResult {
    /// Create an empty result.
    pub fn new(kind: DocumentKind, source_path: impl Into<String>) -> Self {
        Self {
            kind,
            source_path: source_path.into(),
            sections: Vec::new(),
        }
    }

    /// Check if no content was extracted.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over paragraph sections as `(index, text)`.
    pub fn paragraphs(&self) -> impl Iterator<Item = (usize, &str)> {
        self.sections.iter().filter_map(|s| match s {
            Section::Paragraph { index, text } => Some((*index, text.as_str())),
            _ => None,
        })
    }

    /// Iterate over table sections as `(index, rows)`.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &[Row])> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table { index, rows } => Some((*index, rows.as_slice())),
            _ => None,
        })
    }

    /// Iterate over slide sections as `(index, texts)`.
    pub fn slides(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.sections.iter().filter_map(|s| match s {
            Section::Slide { index, texts } => Some((*index, texts.as_slice())),
            _ => None,
        })
    }

    /// Display name of the source: its file name, or the whole string.
    pub fn display_name(&self) -> &str {
        Path::new(&self.source_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.source_path)
    }

    /// All extracted text joined by newlines.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for section in &self.sections {
            match section {
                Section::Paragraph { text, .. } => lines.push(text.clone()),
                Section::Table { rows, .. } => {
                    lines.extend(rows.iter().map(|r| r.cells.join("\t")));
                }
                Section::Slide { texts, .. } => lines.extend(texts.iter().cloned()),
            }
        }
        lines.join("\n")
    }
}
