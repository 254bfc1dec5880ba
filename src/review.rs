//! Batch review of a directory of documents.
//!
//! Every `.docx` and `.pptx` file under a directory is extracted on its
//! own; a document that fails to load is recorded and the rest of the
//! batch continues.

use crate::error::Result;
use crate::model::{DocumentKind, ExtractionResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which directory to review and how.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Directory to scan
    pub root: PathBuf,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Document kinds to include
    pub kinds: Vec<DocumentKind>,
}

impl ReviewConfig {
    /// Review the top level of `root`, both document kinds.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            kinds: vec![DocumentKind::WordDocument, DocumentKind::SlideDeck],
        }
    }

    /// Enable or disable descending into subdirectories.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Restrict the review to the given kinds.
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = DocumentKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        DocumentKind::from_path(path)
            .map(|kind| self.kinds.contains(&kind))
            .unwrap_or(false)
    }
}

/// The outcome of extracting one document.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Path of the document
    pub path: PathBuf,
    /// Extracted content, or why it could not be loaded
    pub result: Result<ExtractionResult>,
}

impl DocumentOutcome {
    /// Check if the document was extracted.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-document outcomes of a batch, in scan order.
#[derive(Debug, Default)]
pub struct ReviewReport {
    /// One outcome per reviewed document
    pub documents: Vec<DocumentOutcome>,
}

impl ReviewReport {
    /// Documents that were extracted.
    pub fn succeeded(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents.iter().filter(|d| d.is_ok())
    }

    /// Documents that failed to load.
    pub fn failed(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents.iter().filter(|d| !d.is_ok())
    }

    /// Number of reviewed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents were reviewed.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// List the documents a review would process, sorted by path.
///
/// Fails if `root` does not exist or is not a directory.
pub fn scan_directory(config: &ReviewConfig) -> Result<Vec<PathBuf>> {
    if !config.root.is_dir() {
        let kind = if config.root.exists() {
            io::ErrorKind::InvalidInput
        } else {
            io::ErrorKind::NotFound
        };
        return Err(io::Error::new(
            kind,
            format!("Directory {} not found", config.root.display()),
        )
        .into());
    }

    let mut files = Vec::new();
    let mut pending = vec![config.root.clone()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            // file_type() does not follow symlinks; linked directories are skipped
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if config.recursive {
                    pending.push(path);
                }
            } else if file_type.is_symlink() && path.is_dir() {
                log::debug!("not following directory link {}", path.display());
            } else if config.accepts(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    log::debug!("found {} document(s) in {}", files.len(), config.root.display());
    Ok(files)
}

/// Extract every listed document, recording failures per document.
pub fn review_files<I>(paths: I) -> ReviewReport
where
    I: IntoIterator<Item = PathBuf>,
{
    review_files_with(paths, |_| {})
}

/// Like [`review_files`], calling `on_document` before each document is loaded.
pub fn review_files_with<I, F>(paths: I, mut on_document: F) -> ReviewReport
where
    I: IntoIterator<Item = PathBuf>,
    F: FnMut(&Path),
{
    let documents = paths
        .into_iter()
        .map(|path| {
            on_document(&path);
            let result = crate::extract_path(&path);
            if let Err(ref e) = result {
                log::warn!("skipping {}: {}", path.display(), e);
            }
            DocumentOutcome { path, result }
        })
        .collect();

    ReviewReport { documents }
}

/// Scan a directory and extract every document in it.
///
/// # Example
///
/// ```no_run
/// use docreview::review::{review_directory, ReviewConfig};
///
/// let config = ReviewConfig::new("/Users/me/review").with_recursive(true);
/// let report = review_directory(&config)?;
/// println!("{} of {} documents extracted", report.succeeded().count(), report.len());
/// # Ok::<(), docreview::Error>(())
/// ```
pub fn review_directory(config: &ReviewConfig) -> Result<ReviewReport> {
    let files = scan_directory(config)?;
    Ok(review_files(files))
}
