//! ZIP container abstraction for OOXML packages.

use crate::error::{LoadError, LoadResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
    order: Vec<String>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// First relationship whose type ends with the given suffix.
    ///
    /// Strict and transitional OOXML use different namespace URIs, so
    /// callers match on the trailing segment (e.g. `/officeDocument`).
    pub fn find_by_type_suffix(&self, suffix: &str) -> Option<&Relationship> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .find(|rel| rel.rel_type.ends_with(suffix))
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        if !self.by_id.contains_key(&rel.id) {
            self.order.push(rel.id.clone());
        }
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix the XML declaration after a UTF-16 document was decoded to UTF-8.
///
/// quick-xml honours `encoding="UTF-16"` and would re-decode the string.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> LoadResult<String> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| LoadError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if bytes.starts_with(&[0xFF, 0xFE]) {
        let content = decode_utf16(&bytes[2..], u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.starts_with(&[0xFE, 0xFF]) {
        let content = decode_utf16(&bytes[2..], u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // No BOM: ASCII markup in UTF-16 leaves a zero byte beside every character
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
                    .map(|c| fix_xml_encoding_declaration(&c))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
                    .map(|c| fix_xml_encoding_declaration(&c))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> LoadResult<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| LoadError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container over an in-memory ZIP archive.
///
/// [`OoxmlContainer::open`] reads the whole file and closes it before the
/// archive is inspected, so no file handle outlives the call.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docreview::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// # Ok::<(), docreview::LoadError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let data = {
            let file = File::open(path.as_ref())?;
            let mut reader = BufReader::new(file);
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            data
        };
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> LoadResult<Self> {
        crate::detect::check_signature(&data)?;
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> LoadResult<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| LoadError::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all part names in the archive.
    pub fn list_files(&self) -> Vec<String> {
        self.archive.borrow().file_names().map(String::from).collect()
    }

    /// Read the relationships of a part. A missing .rels file is empty.
    ///
    /// Pass `""` for the package-level relationships (`_rels/.rels`).
    pub fn read_relationships(&self, part_path: &str) -> LoadResult<Relationships> {
        let rels_path = rels_path_for(part_path);
        let content = match self.read_xml(&rels_path) {
            Ok(c) => c,
            Err(LoadError::MissingComponent(_)) => return Ok(Relationships::new()),
            Err(e) => return Err(e),
        };
        parse_relationships(&content)
    }

    /// Path of the package's main part, from the `officeDocument` relationship.
    pub fn main_part(&self) -> LoadResult<Option<String>> {
        let rels = self.read_relationships("")?;
        Ok(rels
            .find_by_type_suffix("/officeDocument")
            .map(|rel| Self::resolve_path("", &rel.target)))
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

/// `word/document.xml` -> `word/_rels/document.xml.rels`
fn rels_path_for(part_path: &str) -> String {
    if part_path.is_empty() || part_path == "/" {
        return "_rels/.rels".to_string();
    }
    match part_path.rfind('/') {
        Some(slash) => format!(
            "{}/_rels/{}.rels",
            &part_path[..slash],
            &part_path[slash + 1..]
        ),
        None => format!("_rels/{}.rels", part_path),
    }
}

fn parse_relationships(content: &str) -> LoadResult<Relationships> {
    let mut rels = Relationships::new();
    if content.trim().is_empty() {
        return Ok(rels);
    }

    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                if e.name().local_name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        b"TargetMode" => {
                            external = String::from_utf8_lossy(&attr.value)
                                .eq_ignore_ascii_case("external")
                        }
                        _ => {}
                    }
                }

                if !id.is_empty() {
                    rels.add(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(LoadError::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for(""), "_rels/.rels");
        assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
    }

    #[test]
    fn test_relationships_keep_declaration_order() {
        let rels = parse_relationships(
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://x/thumbnail" Target="docProps/thumbnail.jpeg"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId3" Type="http://x/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#,
        )
        .unwrap();

        assert_eq!(rels.len(), 3);
        assert_eq!(
            rels.find_by_type_suffix("/officeDocument").unwrap().target,
            "word/document.xml"
        );
        assert!(rels.get("rId3").unwrap().external);
        assert!(rels.get("rId4").is_none());
    }

    #[test]
    fn test_main_part_from_package_rels() {
        let data = package(&[
            (
                "_rels/.rels",
                r#"<Relationships><Relationship Id="rId1" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument" Target="/word/main.xml"/></Relationships>"#,
            ),
            ("word/main.xml", "<w:document/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.main_part().unwrap().as_deref(), Some("word/main.xml"));
        assert!(container.exists("word/main.xml"));
    }

    #[test]
    fn test_missing_part() {
        let container = OoxmlContainer::from_bytes(package(&[("a.xml", "<a/>")])).unwrap();
        assert!(matches!(
            container.read_xml("b.xml"),
            Err(LoadError::MissingComponent(ref p)) if p == "b.xml"
        ));
        assert!(container.read_relationships("a.xml").unwrap().is_empty());
        assert_eq!(container.main_part().unwrap(), None);
    }

    #[test]
    fn test_open_missing_file() {
        let result = OoxmlContainer::open("/nonexistent/review/missing.docx");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_utf16_decoding() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(
            decode_xml_bytes(&bytes).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>"
        );
    }
}
