//! Content extraction and normalization.
//!
//! Turns a loaded [`WordDocument`] or [`SlideDeck`] into an
//! [`ExtractionResult`]. Text is tested for blankness after trimming
//! surrounding whitespace; paragraph and shape texts are stored untrimmed,
//! table cells are stored trimmed.

use crate::model::{
    DocumentKind, ExtractionResult, Row, Section, SlideDeck, WordDocument, WordRow,
};

/// Check if text has no visible content.
fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Extract paragraphs and tables from a Word document.
///
/// All paragraph sections come first, then one table section per table.
/// A table whose rows are all blank still yields a section with no rows.
pub fn extract_word(model: &WordDocument, source_path: impl Into<String>) -> ExtractionResult {
    let mut result = ExtractionResult::new(DocumentKind::WordDocument, source_path);

    for (index, text) in model.paragraphs.iter().enumerate() {
        if !is_blank(text) {
            result.sections.push(Section::Paragraph {
                index,
                text: text.clone(),
            });
        }
    }

    for (index, table) in model.tables.iter().enumerate() {
        let rows = table.rows.iter().filter_map(normalize_row).collect();
        result.sections.push(Section::Table { index, rows });
    }

    log::debug!(
        "extracted {} paragraph(s) and {} table(s) from {}",
        result.paragraphs().count(),
        model.tables.len(),
        result.source_path
    );

    result
}

/// Trim every cell; drop the row if nothing is left.
fn normalize_row(row: &WordRow) -> Option<Row> {
    let cells: Vec<String> = row.cells.iter().map(|c| c.text.trim().to_string()).collect();
    if cells.iter().all(String::is_empty) {
        None
    } else {
        Some(Row::new(cells))
    }
}

/// Extract shape texts from a slide deck, one section per slide.
pub fn extract_slides(model: &SlideDeck, source_path: impl Into<String>) -> ExtractionResult {
    let mut result = ExtractionResult::new(DocumentKind::SlideDeck, source_path);

    for (index, slide) in model.slides.iter().enumerate() {
        let texts = slide
            .shapes
            .iter()
            .filter_map(|shape| shape.text.as_ref())
            .filter(|text| !is_blank(text))
            .cloned()
            .collect();
        result.sections.push(Section::Slide { index, texts });
    }

    log::debug!(
        "extracted {} slide(s) from {}",
        result.sections.len(),
        result.source_path
    );

    result
}
