//! Error types for the docreview library.

use crate::model::DocumentKind;
use std::io;
use thiserror::Error;

/// Result type alias for docreview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias used by the document loaders.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors surfaced to callers of the extraction API.
#[derive(Error, Debug)]
pub enum Error {
    /// The document could not be loaded as the declared kind.
    #[error("Failed to load {path}: {cause}")]
    DocumentLoad {
        /// Path (or source name) of the document that failed.
        path: String,
        /// Underlying cause.
        #[source]
        cause: LoadError,
    },

    /// The caller declared a document kind the extractor does not handle.
    #[error("Unsupported document kind: {0}")]
    UnsupportedKind(String),

    /// I/O error outside of document loading (directory scans, output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while rendering a result.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Wrap a loader failure with the path it occurred on.
    pub fn load(path: impl Into<String>, cause: LoadError) -> Self {
        Error::DocumentLoad {
            path: path.into(),
            cause,
        }
    }

    /// The path of the failed document, if this is a load failure.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::DocumentLoad { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if this is a document load failure.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::DocumentLoad { .. })
    }
}

/// Reasons a Word or PowerPoint container could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not an Office Open XML package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// OLE compound file: a legacy binary document or an encrypted package.
    #[error("Legacy or encrypted document (OLE compound file)")]
    LegacyFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The package holds a different kind of document than declared.
    #[error("Expected {expected}, found {found}")]
    KindMismatch {
        /// Kind the caller asked for.
        expected: DocumentKind,
        /// What the package actually contains.
        found: String,
    },
}

impl From<zip::result::ZipError> for LoadError {
    fn from(err: zip::result::ZipError) -> Self {
        LoadError::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(err: quick_xml::Error) -> Self {
        LoadError::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedKind("spreadsheet".to_string());
        assert_eq!(err.to_string(), "Unsupported document kind: spreadsheet");

        let err = Error::load("review/notes.docx", LoadError::UnknownFormat);
        assert_eq!(
            err.to_string(),
            "Failed to load review/notes.docx: Unknown file format"
        );
    }

    #[test]
    fn test_load_error_path() {
        let err = Error::load(
            "deck.pptx",
            LoadError::MissingComponent("ppt/slides/slide1.xml".into()),
        );
        assert!(err.is_load_error());
        assert_eq!(err.path(), Some("deck.pptx"));

        let err = Error::UnsupportedKind("xlsx".into());
        assert!(!err.is_load_error());
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_kind_mismatch_display() {
        let err = LoadError::KindMismatch {
            expected: DocumentKind::WordDocument,
            found: "PowerPoint Presentation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Expected Word Document, found PowerPoint Presentation"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: LoadError = io_err.into();
        assert!(matches!(err, LoadError::Io(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "dir not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
