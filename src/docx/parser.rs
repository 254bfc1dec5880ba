//! DOCX parser implementation.

use crate::container::OoxmlContainer;
use crate::detect::ensure_kind;
use crate::error::{LoadError, LoadResult};
use crate::model::{DocumentKind, WordCell, WordDocument, WordRow, WordTable};
use quick_xml::events::{BytesStart, Event};

/// Main part location when the package relationships do not name one.
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    container: OoxmlContainer,
    main_part: String,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> LoadResult<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> LoadResult<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from a container.
    fn from_container(container: OoxmlContainer) -> LoadResult<Self> {
        ensure_kind(&container, DocumentKind::WordDocument)?;

        let main_part = container
            .main_part()?
            .filter(|part| container.exists(part))
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        if !container.exists(&main_part) {
            return Err(LoadError::MissingComponent(main_part));
        }

        Ok(Self {
            container,
            main_part,
        })
    }

    /// Parse the document body into a [`WordDocument`].
    pub fn parse(&self) -> LoadResult<WordDocument> {
        let xml = self.container.read_xml(self.main_part())?;
        let doc = parse_document_xml(&xml)?;
        log::debug!(
            "{}: {} paragraph(s), {} table(s)",
            self.main_part(),
            doc.paragraphs.len(),
            doc.tables.len()
        );
        Ok(doc)
    }

    /// Path of the main document part inside the package.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }
}

/// Parse a `word/document.xml` part.
///
/// Only direct children of `w:body` count: body paragraphs and body
/// tables. Paragraphs inside tables, content controls and text boxes are
/// not body paragraphs.
pub fn parse_document_xml(xml: &str) -> LoadResult<WordDocument> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace: xml:space="preserve" runs carry meaningful spaces
    reader.config_mut().trim_text(false);

    let mut walker = BodyWalker::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => walker.open(e),
            Ok(Event::Empty(ref e)) => {
                walker.open(e);
                walker.close();
            }
            Ok(Event::End(_)) => walker.close(),
            Ok(Event::Text(ref e)) => {
                if walker.collecting_text() {
                    let text = e
                        .unescape()
                        .map_err(|err| LoadError::XmlParse(err.to_string()))?;
                    walker.push_text(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(LoadError::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.doc)
}

/// Where a paragraph's text goes when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphOwner {
    Body,
    Cell,
}

#[derive(Debug)]
struct ParagraphState {
    depth: usize,
    owner: ParagraphOwner,
    text: String,
    run_depth: Option<usize>,
    in_text: bool,
}

#[derive(Debug)]
struct CellState {
    depth: usize,
    paragraphs: Vec<String>,
    grid_span: usize,
    continues_merge: bool,
}

#[derive(Debug)]
struct RowState {
    depth: usize,
    cells: Vec<WordCell>,
    grid_col: usize,
}

#[derive(Debug)]
struct TableState {
    depth: usize,
    rows: Vec<WordRow>,
    /// Text last written to each grid column, for vertical merges.
    column_texts: Vec<String>,
}

/// Streaming state over the element tree of a document part.
#[derive(Debug, Default)]
struct BodyWalker {
    doc: WordDocument,
    stack: Vec<Vec<u8>>,
    body_depth: Option<usize>,
    table: Option<TableState>,
    row: Option<RowState>,
    cell: Option<CellState>,
    paragraph: Option<ParagraphState>,
}

impl BodyWalker {
    fn parent(&self) -> Option<&[u8]> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i].as_slice())
    }

    fn collecting_text(&self) -> bool {
        self.paragraph.as_ref().is_some_and(|p| p.in_text)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            p.text.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart) {
        self.stack.push(e.local_name().as_ref().to_vec());
        let depth = self.stack.len();
        let name = e.local_name();

        match name.as_ref() {
            b"body" if self.body_depth.is_none() => self.body_depth = Some(depth),
            b"p" => self.open_paragraph(depth),
            b"tbl" if self.is_body_child(depth) && self.table.is_none() => {
                self.table = Some(TableState {
                    depth,
                    rows: Vec::new(),
                    column_texts: Vec::new(),
                });
            }
            b"tr" if self.table.as_ref().is_some_and(|t| t.depth + 1 == depth) => {
                self.row = Some(RowState {
                    depth,
                    cells: Vec::new(),
                    grid_col: 0,
                });
            }
            b"tc" if self.row.as_ref().is_some_and(|r| r.depth + 1 == depth) => {
                self.cell = Some(CellState {
                    depth,
                    paragraphs: Vec::new(),
                    grid_span: 1,
                    continues_merge: false,
                });
            }
            b"gridSpan" | b"vMerge" if self.in_cell_properties(depth) => {
                let val = attr_value(e, b"val");
                if let Some(cell) = self.cell.as_mut() {
                    if name.as_ref() == b"gridSpan" {
                        cell.grid_span = val.and_then(|v| v.parse().ok()).unwrap_or(1).max(1);
                    } else {
                        // A bare <w:vMerge/> continues the merge
                        cell.continues_merge = val.as_deref().map_or(true, |v| v == "continue");
                    }
                }
            }
            b"r" if self.is_run_of_paragraph(depth) => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.run_depth = Some(depth);
                }
            }
            b"t" if self.is_run_child(depth) => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.in_text = true;
                }
            }
            b"tab" | b"ptab" if self.is_run_child(depth) => self.push_text("\t"),
            // Page and column breaks carry no text
            b"br" if self.is_run_child(depth) => {
                let break_type = attr_value(e, b"type");
                if break_type.map_or(true, |t| t == "textWrapping") {
                    self.push_text("\n");
                }
            }
            b"cr" if self.is_run_child(depth) => self.push_text("\n"),
            b"noBreakHyphen" if self.is_run_child(depth) => self.push_text("-"),
            _ => {}
        }
    }

    fn close(&mut self) {
        let depth = self.stack.len();
        let name = match self.stack.last() {
            Some(name) => name.clone(),
            None => return,
        };

        match name.as_slice() {
            b"t" if self.is_run_child(depth) => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.in_text = false;
                }
            }
            b"r" => {
                if let Some(p) = self.paragraph.as_mut() {
                    if p.run_depth == Some(depth) {
                        p.run_depth = None;
                    }
                }
            }
            b"p" if self.paragraph.as_ref().is_some_and(|p| p.depth == depth) => {
                self.close_paragraph();
            }
            b"tc" if self.cell.as_ref().is_some_and(|c| c.depth == depth) => self.close_cell(),
            b"tr" if self.row.as_ref().is_some_and(|r| r.depth == depth) => {
                if let (Some(row), Some(table)) = (self.row.take(), self.table.as_mut()) {
                    table.rows.push(WordRow { cells: row.cells });
                }
            }
            b"tbl" if self.table.as_ref().is_some_and(|t| t.depth == depth) => {
                if let Some(table) = self.table.take() {
                    self.doc.add_table(WordTable { rows: table.rows });
                }
            }
            b"body" if self.body_depth == Some(depth) => self.body_depth = None,
            _ => {}
        }

        self.stack.pop();
    }

    fn is_body_child(&self, depth: usize) -> bool {
        self.body_depth.is_some_and(|b| b + 1 == depth)
    }

    fn in_cell_properties(&self, depth: usize) -> bool {
        self.cell.as_ref().is_some_and(|c| c.depth + 2 == depth)
            && self.parent() == Some(b"tcPr".as_slice())
    }

    /// Runs count when they sit directly in the paragraph or in a hyperlink.
    fn is_run_of_paragraph(&self, depth: usize) -> bool {
        match self.paragraph.as_ref() {
            Some(p) if p.run_depth.is_none() => {
                p.depth + 1 == depth
                    || (p.depth + 2 == depth && self.parent() == Some(b"hyperlink".as_slice()))
            }
            _ => false,
        }
    }

    fn is_run_child(&self, depth: usize) -> bool {
        self.paragraph
            .as_ref()
            .and_then(|p| p.run_depth)
            .is_some_and(|r| r + 1 == depth)
    }

    fn open_paragraph(&mut self, depth: usize) {
        if self.paragraph.is_some() {
            return;
        }
        let owner = if self.is_body_child(depth) {
            ParagraphOwner::Body
        } else if self.cell.as_ref().is_some_and(|c| c.depth + 1 == depth) {
            ParagraphOwner::Cell
        } else {
            return;
        };
        self.paragraph = Some(ParagraphState {
            depth,
            owner,
            text: String::new(),
            run_depth: None,
            in_text: false,
        });
    }

    fn close_paragraph(&mut self) {
        let Some(p) = self.paragraph.take() else {
            return;
        };
        match p.owner {
            ParagraphOwner::Body => self.doc.add_paragraph(p.text),
            ParagraphOwner::Cell => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.paragraphs.push(p.text);
                }
            }
        }
    }

    /// Emit one model cell per grid column the cell covers.
    fn close_cell(&mut self) {
        let (Some(cell), Some(row), Some(table)) =
            (self.cell.take(), self.row.as_mut(), self.table.as_mut())
        else {
            return;
        };

        let mut text = cell.paragraphs.join("\n");
        if cell.continues_merge {
            if let Some(above) = table.column_texts.get(row.grid_col) {
                text = above.clone();
            }
        }

        for _ in 0..cell.grid_span {
            if table.column_texts.len() <= row.grid_col {
                table.column_texts.resize(row.grid_col + 1, String::new());
            }
            table.column_texts[row.grid_col] = text.clone();
            row.cells.push(WordCell::with_text(text.clone()));
            row.grid_col += 1;
        }
    }
}

/// Value of the attribute with the given local name.
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            inner
        )
    }

    fn cells(row: &WordRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_body_paragraphs_in_order() {
        let xml = body(
            r#"<w:p/>
<w:p><w:r><w:t>Hello</w:t></w:r></w:p>
<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Wor</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ld </w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["", "Hello", "World ", "   "]);
        assert!(doc.tables.is_empty());
    }

    #[test]
    fn test_run_breaks_tabs_and_hyperlinks() {
        let xml = body(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r><w:hyperlink w:id="rId4"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["a\tb\nclink"]);
    }

    #[test]
    fn test_page_and_column_breaks_add_no_text() {
        let xml = body(
            r#"<w:p><w:r><w:t>Text</w:t><w:br w:type="page"/></w:r></w:p>
<w:p><w:r><w:t>a</w:t><w:br w:type="column"/><w:t>b</w:t><w:br w:type="textWrapping"/><w:t>c</w:t></w:r></w:p>
<w:p><w:r><w:t>x</w:t><w:ptab w:relativeTo="margin" w:alignment="right" w:leader="none"/><w:t>y</w:t><w:cr/></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["Text", "ab\nc", "x\ty\n"]);
    }

    #[test]
    fn test_tab_stops_are_not_text() {
        let xml = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["x"]);
    }

    #[test]
    fn test_text_box_content_excluded() {
        let xml = body(
            r#"<w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["Outer"]);
    }

    #[test]
    fn test_escaped_text() {
        let xml = body(r#"<w:p><w:r><w:t>Q&amp;A &lt;draft&gt;</w:t></w:r></w:p>"#);
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["Q&A <draft>"]);
    }

    #[test]
    fn test_table_cells_are_not_body_paragraphs() {
        let xml = body(
            r#"<w:p><w:r><w:t>Intro</w:t></w:r></w:p>
<w:tbl><w:tblPr/><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>
<w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p><w:p><w:r><w:t>B2</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t xml:space="preserve">  </w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>
<w:p><w:r><w:t>Outro</w:t></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["Intro", "Outro"]);
        assert_eq!(doc.tables.len(), 1);
        let rows = &doc.tables[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[0]), vec!["A", "B\nB2"]);
        assert_eq!(cells(&rows[1]), vec!["", "  "]);
    }

    #[test]
    fn test_nested_table_not_in_cell_text() {
        let xml = body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Outer</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Nested</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.tables[0].rows.len(), 1);
        assert_eq!(cells(&doc.tables[0].rows[0]), vec!["Outer\n"]);
    }

    #[test]
    fn test_grid_span_repeats_cell() {
        let xml = body(
            r#"<w:tbl>
<w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Wide</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(cells(&doc.tables[0].rows[0]), vec!["Wide", "Wide", "C"]);
    }

    #[test]
    fn test_vertical_merge_repeats_cell_above() {
        let xml = body(
            r#"<w:tbl>
<w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>Tall</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc><w:tc><w:p><w:r><w:t>2</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        let rows = &doc.tables[0].rows;
        assert_eq!(cells(&rows[0]), vec!["Tall", "1"]);
        assert_eq!(cells(&rows[1]), vec!["Tall", "2"]);
    }

    #[test]
    fn test_multiple_tables_in_order() {
        let xml = body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>first</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p/>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>second</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec![""]);
        assert_eq!(doc.tables.len(), 2);
        assert_eq!(cells(&doc.tables[1].rows[0]), vec!["second"]);
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse_document_xml("<w:document><w:body><w:p></w:body>");
        assert!(matches!(result, Err(LoadError::XmlParse(_))));
    }
}
