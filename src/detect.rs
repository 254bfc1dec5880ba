//! Package detection for Office Open XML documents.

use crate::container::OoxmlContainer;
use crate::error::{Error, LoadError, LoadResult, Result};
use crate::model::DocumentKind;
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound file magic: legacy .doc/.ppt and encrypted OOXML.
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for macro-enabled DOCM main document part.
const DOCM_CONTENT_TYPE: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";

/// Content type for PPTX presentation part.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Content type for macro-enabled PPTM presentation part.
const PPTM_CONTENT_TYPE: &str = "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";

/// Content type for XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// What an OOXML package contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    /// WordprocessingML
    Word,
    /// PresentationML
    Presentation,
    /// SpreadsheetML, recognised only to be rejected
    Spreadsheet,
}

impl PackageType {
    /// The document kind this package can be extracted as.
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            PackageType::Word => Some(DocumentKind::WordDocument),
            PackageType::Presentation => Some(DocumentKind::SlideDeck),
            PackageType::Spreadsheet => None,
        }
    }

    /// Returns a human-readable name for this package type.
    pub fn name(&self) -> &'static str {
        match self {
            PackageType::Word => "Word Document",
            PackageType::Presentation => "PowerPoint Presentation",
            PackageType::Spreadsheet => "Excel Workbook",
        }
    }
}

/// Reject data that is not a ZIP archive before handing it to `zip`.
pub(crate) fn check_signature(data: &[u8]) -> LoadResult<()> {
    if data.starts_with(&CFB_MAGIC) {
        return Err(LoadError::LegacyFormat);
    }
    if !is_zip_file(data) {
        return Err(LoadError::UnknownFormat);
    }
    Ok(())
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Determine the package type from `[Content_Types].xml`.
///
/// Falls back to the top-level folder layout when the content types
/// do not name a known main part.
pub fn detect_package(container: &OoxmlContainer) -> LoadResult<PackageType> {
    // read_xml already reports an absent part as MissingComponent
    let content_types = container.read_xml("[Content_Types].xml")?;

    if content_types.contains(DOCX_CONTENT_TYPE) || content_types.contains(DOCM_CONTENT_TYPE) {
        Ok(PackageType::Word)
    } else if content_types.contains(PPTX_CONTENT_TYPE)
        || content_types.contains(PPTM_CONTENT_TYPE)
    {
        Ok(PackageType::Presentation)
    } else if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(PackageType::Spreadsheet)
    } else {
        detect_by_folder_structure(container)
    }
}

fn detect_by_folder_structure(container: &OoxmlContainer) -> LoadResult<PackageType> {
    let names = container.list_files();

    let has_word = names.iter().any(|n| n.starts_with("word/"));
    let has_xl = names.iter().any(|n| n.starts_with("xl/"));
    let has_ppt = names.iter().any(|n| n.starts_with("ppt/"));

    match (has_word, has_xl, has_ppt) {
        (true, false, false) => Ok(PackageType::Word),
        (false, true, false) => Ok(PackageType::Spreadsheet),
        (false, false, true) => Ok(PackageType::Presentation),
        _ => Err(LoadError::UnknownFormat),
    }
}

/// Fail unless the package holds a document of the expected kind.
pub fn ensure_kind(container: &OoxmlContainer, expected: DocumentKind) -> LoadResult<()> {
    let package = detect_package(container)?;
    if package.kind() == Some(expected) {
        Ok(())
    } else {
        Err(LoadError::KindMismatch {
            expected,
            found: package.name().to_string(),
        })
    }
}

/// Detect the document kind of a file from its contents.
///
/// # Example
///
/// ```no_run
/// use docreview::detect::detect_kind_from_path;
///
/// let kind = detect_kind_from_path("slides.pptx")?;
/// println!("Detected: {}", kind);
/// # Ok::<(), docreview::Error>(())
/// ```
pub fn detect_kind_from_path(path: impl AsRef<Path>) -> Result<DocumentKind> {
    let path = path.as_ref();
    let container =
        OoxmlContainer::open(path).map_err(|e| Error::load(path.display().to_string(), e))?;
    kind_of(&container, &path.display().to_string())
}

/// Detect the document kind of in-memory package bytes.
pub fn detect_kind_from_bytes(data: &[u8]) -> Result<DocumentKind> {
    let container =
        OoxmlContainer::from_bytes(data.to_vec()).map_err(|e| Error::load("<bytes>", e))?;
    kind_of(&container, "<bytes>")
}

fn kind_of(container: &OoxmlContainer, source: &str) -> Result<DocumentKind> {
    let package = detect_package(container).map_err(|e| Error::load(source, e))?;
    package
        .kind()
        .ok_or_else(|| Error::UnsupportedKind(package.name().to_string()))
}
