//! # docreview
//!
//! Text extraction from Word and PowerPoint documents for manual review.
//!
//! Documents are loaded into a small in-memory model (body paragraphs and
//! tables, or slides and shapes) and normalized into an
//! [`ExtractionResult`]: blank paragraphs, blank rows and blank shapes are
//! dropped, source order and source indices are kept.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docreview::{extract_path, render};
//!
//! let result = extract_path("review/Week 1 boards and course work.docx")?;
//! for (index, text) in result.paragraphs() {
//!     println!("Paragraph {}: {}", index + 1, text);
//! }
//!
//! // Console rendering
//! let text = render::to_text(&result, &render::RenderOptions::default());
//! println!("{}", text);
//! # Ok::<(), docreview::Error>(())
//! ```
//!
//! ## Batch review
//!
//! ```no_run
//! use docreview::review::{review_directory, ReviewConfig};
//!
//! let report = review_directory(&ReviewConfig::new("review"))?;
//! for outcome in report.failed() {
//!     eprintln!("{}", outcome.path.display());
//! }
//! # Ok::<(), docreview::Error>(())
//! ```
//!
//! ## Features
//!
//! - `docx` (default): Word document support
//! - `pptx` (default): PowerPoint presentation support

pub mod container;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod review;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "pptx")]
pub mod pptx;

// Re-exports
pub use container::OoxmlContainer;
pub use detect::{detect_kind_from_bytes, detect_kind_from_path};
pub use error::{Error, LoadError, Result};
pub use extract::{extract_slides, extract_word};
pub use model::{
    DocumentKind, ExtractionResult, Row, Section, Shape, ShapeKind, Slide, SlideDeck, WordCell,
    WordDocument, WordRow, WordTable,
};

use std::path::Path;

/// Extract a document of a declared kind.
///
/// The document is loaded, normalized and released within this call.
/// Any load failure is reported as [`Error::DocumentLoad`] carrying the
/// path; no partial result is produced.
///
/// # Example
///
/// ```no_run
/// use docreview::{extract_file, DocumentKind};
///
/// let result = extract_file("slides.pptx", DocumentKind::SlideDeck)?;
/// println!("Slides: {}", result.sections.len());
/// # Ok::<(), docreview::Error>(())
/// ```
pub fn extract_file(path: impl AsRef<Path>, kind: DocumentKind) -> Result<ExtractionResult> {
    let path = path.as_ref();
    let source = path.display().to_string();
    log::debug!("loading {} as {}", source, kind);

    match kind {
        #[cfg(feature = "docx")]
        DocumentKind::WordDocument => {
            let model = docx::DocxParser::open(path)
                .and_then(|parser| parser.parse())
                .map_err(|cause| Error::load(&source, cause))?;
            Ok(extract_word(&model, source))
        }
        #[cfg(feature = "pptx")]
        DocumentKind::SlideDeck => {
            let model = pptx::PptxParser::open(path)
                .and_then(|parser| parser.parse())
                .map_err(|cause| Error::load(&source, cause))?;
            Ok(extract_slides(&model, source))
        }
        #[cfg(not(all(feature = "docx", feature = "pptx")))]
        _ => Err(Error::UnsupportedKind(kind.to_string())),
    }
}

/// Extract a document, inferring its kind from the file extension.
///
/// # Example
///
/// ```no_run
/// let result = docreview::extract_path("report.docx")?;
/// println!("{}", result.plain_text());
/// # Ok::<(), docreview::Error>(())
/// ```
pub fn extract_path(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    let path = path.as_ref();
    let kind = DocumentKind::from_path(path)?;
    extract_file(path, kind)
}

/// Extract a Word document.
pub fn extract_word_file(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    extract_file(path, DocumentKind::WordDocument)
}

/// Extract a PowerPoint presentation.
pub fn extract_slides_file(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    extract_file(path, DocumentKind::SlideDeck)
}

/// Extract a document from package bytes.
///
/// `source_name` identifies the document in the result and in errors.
///
/// # Example
///
/// ```no_run
/// use docreview::{extract_bytes, DocumentKind};
///
/// let data = std::fs::read("document.docx")?;
/// let result = extract_bytes(&data, DocumentKind::WordDocument, "document.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract_bytes(
    data: &[u8],
    kind: DocumentKind,
    source_name: impl Into<String>,
) -> Result<ExtractionResult> {
    let source = source_name.into();

    match kind {
        #[cfg(feature = "docx")]
        DocumentKind::WordDocument => {
            let model = docx::DocxParser::from_bytes(data.to_vec())
                .and_then(|parser| parser.parse())
                .map_err(|cause| Error::load(&source, cause))?;
            Ok(extract_word(&model, source))
        }
        #[cfg(feature = "pptx")]
        DocumentKind::SlideDeck => {
            let model = pptx::PptxParser::from_bytes(data.to_vec())
                .and_then(|parser| parser.parse())
                .map_err(|cause| Error::load(&source, cause))?;
            Ok(extract_slides(&model, source))
        }
        #[cfg(not(all(feature = "docx", feature = "pptx")))]
        _ => Err(Error::UnsupportedKind(kind.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_load_error() {
        let path = "/nonexistent/review/Rapid Care inc.docx";
        match extract_word_file(path) {
            Err(Error::DocumentLoad { path: p, cause }) => {
                assert_eq!(p, path);
                assert!(matches!(cause, LoadError::Io(_)));
            }
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let result = extract_path("notes.txt");
        assert!(matches!(result, Err(Error::UnsupportedKind(_))));
    }

    #[test]
    fn test_garbage_bytes_are_load_error() {
        let result = extract_bytes(b"not a package", DocumentKind::SlideDeck, "bad.pptx");
        assert!(matches!(
            result,
            Err(Error::DocumentLoad {
                cause: LoadError::UnknownFormat,
                ..
            })
        ));
    }
}
