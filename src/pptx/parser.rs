//! PPTX parser implementation.

use crate::container::OoxmlContainer;
use crate::detect::ensure_kind;
use crate::error::{LoadError, LoadResult};
use crate::model::{DocumentKind, Shape, ShapeKind, Slide, SlideDeck};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Presentation part location when the package relationships do not name one.
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Parser for PPTX (PowerPoint) presentations.
pub struct PptxParser {
    container: OoxmlContainer,
    slide_paths: Vec<String>,
}

impl PptxParser {
    /// Open a PPTX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
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
        ensure_kind(&container, DocumentKind::SlideDeck)?;

        let presentation_part = container
            .main_part()?
            .filter(|part| container.exists(part))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());

        let slide_paths = Self::parse_slide_list(&container, &presentation_part)?;

        Ok(Self {
            container,
            slide_paths,
        })
    }

    /// Resolve the slide parts listed in `p:sldIdLst`, in presentation order.
    fn parse_slide_list(
        container: &OoxmlContainer,
        presentation_part: &str,
    ) -> LoadResult<Vec<String>> {
        let xml = container.read_xml(presentation_part)?;
        let rels = container.read_relationships(presentation_part)?;

        let mut slide_paths = Vec::new();
        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"sldId" =>
                {
                    // r:id, as opposed to the numeric id attribute
                    let rel_id = e
                        .attributes()
                        .flatten()
                        .find(|attr| {
                            attr.key.local_name().as_ref() == b"id" && attr.key.as_ref() != b"id"
                        })
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                    if let Some(rel_id) = rel_id {
                        let rel = rels.get(&rel_id).ok_or_else(|| {
                            LoadError::MissingComponent(format!("slide relationship {}", rel_id))
                        })?;
                        slide_paths
                            .push(OoxmlContainer::resolve_path(presentation_part, &rel.target));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(LoadError::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(slide_paths)
    }

    /// Number of slides listed in the presentation.
    pub fn slide_count(&self) -> usize {
        self.slide_paths.len()
    }

    /// Parse every slide into a [`SlideDeck`].
    ///
    /// A slide listed in the presentation but absent from the package
    /// fails the whole parse.
    pub fn parse(&self) -> LoadResult<SlideDeck> {
        log::debug!("presentation lists {} slide(s)", self.slide_count());
        let mut deck = SlideDeck::new();
        for slide_path in &self.slide_paths {
            let xml = self.container.read_xml(slide_path)?;
            let slide = parse_slide_xml(&xml)?;
            log::debug!("{}: {} shape(s)", slide_path, slide.shapes.len());
            deck.add_slide(slide);
        }
        Ok(deck)
    }

}

/// Parse a slide part into its top-level shapes.
///
/// Only AutoShapes (`p:sp`) expose text; group shapes are not descended
/// into.
pub fn parse_slide_xml(xml: &str) -> LoadResult<Slide> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Don't trim text - preserve whitespace from xml:space="preserve" elements
    reader.config_mut().trim_text(false);

    let mut walker = ShapeTreeWalker::default();
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

    Ok(Slide::new(walker.shapes))
}

#[derive(Debug)]
struct ShapeState {
    depth: usize,
    shape: Shape,
    /// Paragraph texts of the shape's `p:txBody`.
    paragraphs: Vec<String>,
    body_depth: Option<usize>,
    paragraph_depth: Option<usize>,
    run_depth: Option<usize>,
    in_text: bool,
}

impl ShapeState {
    fn new(depth: usize, kind: ShapeKind) -> Self {
        Self {
            depth,
            shape: Shape::without_text(kind),
            paragraphs: Vec::new(),
            body_depth: None,
            paragraph_depth: None,
            run_depth: None,
            in_text: false,
        }
    }

    fn current_paragraph(&mut self) -> Option<&mut String> {
        if self.paragraph_depth.is_some() {
            self.paragraphs.last_mut()
        } else {
            None
        }
    }

    fn finish(self) -> Shape {
        let mut shape = self.shape;
        if shape.kind.has_text() {
            shape.text = Some(self.paragraphs.join("\n"));
        }
        shape
    }
}

#[derive(Debug, Default)]
struct ShapeTreeWalker {
    shapes: Vec<Shape>,
    stack: Vec<Vec<u8>>,
    tree_depth: Option<usize>,
    current: Option<ShapeState>,
}

impl ShapeTreeWalker {
    fn collecting_text(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.in_text)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.current.as_mut().and_then(ShapeState::current_paragraph) {
            p.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart) {
        self.stack.push(e.local_name().as_ref().to_vec());
        let depth = self.stack.len();
        let name = e.local_name();
        let name = name.as_ref();

        if self.tree_depth.is_none() {
            if name == b"spTree" {
                self.tree_depth = Some(depth);
            }
            return;
        }

        if self.tree_depth.is_some_and(|t| t + 1 == depth) {
            if let Some(kind) = ShapeKind::from_local_name(name) {
                self.current = Some(ShapeState::new(depth, kind));
            }
            return;
        }

        let Some(state) = self.current.as_mut() else {
            return;
        };

        match name {
            // p:nvSpPr/p:cNvPr, p:nvPicPr/p:cNvPr, ...
            b"cNvPr" if state.depth + 2 == depth => {
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"id" => {
                            state.shape.id = String::from_utf8_lossy(&attr.value).parse().ok();
                        }
                        b"name" => {
                            state.shape.name = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }
            }
            b"txBody" if state.depth + 1 == depth => state.body_depth = Some(depth),
            b"p" if state.body_depth.is_some_and(|b| b + 1 == depth) => {
                state.paragraph_depth = Some(depth);
                state.paragraphs.push(String::new());
            }
            b"r" | b"fld" if state.paragraph_depth.is_some_and(|p| p + 1 == depth) => {
                state.run_depth = Some(depth);
            }
            b"br" if state.paragraph_depth.is_some_and(|p| p + 1 == depth) => {
                if let Some(p) = state.current_paragraph() {
                    p.push('\n');
                }
            }
            b"t" if state.run_depth.is_some_and(|r| r + 1 == depth) => state.in_text = true,
            _ => {}
        }
    }

    fn close(&mut self) {
        let depth = self.stack.len();

        if self.tree_depth == Some(depth) {
            self.tree_depth = None;
        } else if let Some(state) = self.current.as_mut() {
            if state.depth == depth {
                if let Some(state) = self.current.take() {
                    self.shapes.push(state.finish());
                }
            } else if state.run_depth.is_some_and(|r| r + 1 == depth) {
                state.in_text = false;
            } else if state.run_depth == Some(depth) {
                state.run_depth = None;
            } else if state.paragraph_depth == Some(depth) {
                state.paragraph_depth = None;
            } else if state.body_depth == Some(depth) {
                state.body_depth = None;
            }
        }

        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(tree: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
            tree
        )
    }

    fn text_shape(id: u32, name: &str, paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
            id, name, body
        )
    }

    fn texts(slide: &Slide) -> Vec<Option<&str>> {
        slide.shapes.iter().map(|s| s.text.as_deref()).collect()
    }

    #[test]
    fn test_shapes_in_tree_order() {
        let xml = slide(&format!(
            "{}{}",
            text_shape(2, "Title 1", &["Welcome"]),
            text_shape(3, "Content 2", &["First point", "Second point"])
        ));
        let parsed = parse_slide_xml(&xml).unwrap();
        assert_eq!(parsed.shapes.len(), 2);
        assert_eq!(parsed.shapes[0].id, Some(2));
        assert_eq!(parsed.shapes[0].name, "Title 1");
        assert_eq!(
            texts(&parsed),
            vec![Some("Welcome"), Some("First point\nSecond point")]
        );
    }

    #[test]
    fn test_fields_and_line_breaks() {
        let xml = slide(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Footer"/></p:nvSpPr><p:txBody><a:p><a:r><a:t>Page </a:t></a:r><a:fld id="{1}" type="slidenum"><a:t>3</a:t></a:fld><a:br/><a:r><a:t>Draft</a:t></a:r><a:endParaRPr/></a:p></p:txBody></p:sp>"#,
        );
        let parsed = parse_slide_xml(&xml).unwrap();
        assert_eq!(texts(&parsed), vec![Some("Page 3\nDraft")]);
    }

    #[test]
    fn test_shape_without_text_body_exposes_empty_text() {
        let xml = slide(r#"<p:sp><p:nvSpPr><p:cNvPr id="5" name="Rectangle 4"/></p:nvSpPr><p:spPr/></p:sp>"#);
        let parsed = parse_slide_xml(&xml).unwrap();
        assert_eq!(texts(&parsed), vec![Some("")]);
    }

    #[test]
    fn test_non_text_shapes() {
        let xml = slide(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="6" name="Picture 5" descr="logo"/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill></p:pic>
<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="7" name="Table 6"/></p:nvGraphicFramePr><a:graphic><a:graphicData><a:tbl><a:tr><a:tc><a:txBody><a:p><a:r><a:t>cell</a:t></a:r></a:p></a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>
<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="8" name="Connector 7"/></p:nvCxnSpPr></p:cxnSp>"#,
        );
        let parsed = parse_slide_xml(&xml).unwrap();
        let kinds: Vec<ShapeKind> = parsed.shapes.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![ShapeKind::Picture, ShapeKind::GraphicFrame, ShapeKind::Connector]
        );
        assert_eq!(texts(&parsed), vec![None, None, None]);
        assert_eq!(parsed.shapes[1].name, "Table 6");
    }

    #[test]
    fn test_group_shape_is_not_descended() {
        let xml = slide(&format!(
            r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="9" name="Group 8"/></p:nvGrpSpPr><p:grpSpPr/>{}</p:grpSp>{}"#,
            text_shape(10, "Inner", &["hidden"]),
            text_shape(11, "Outer", &["shown"])
        ));
        let parsed = parse_slide_xml(&xml).unwrap();
        assert_eq!(parsed.shapes.len(), 2);
        assert_eq!(parsed.shapes[0].kind, ShapeKind::Group);
        assert_eq!(parsed.shapes[0].name, "Group 8");
        assert_eq!(texts(&parsed), vec![None, Some("shown")]);
    }

    #[test]
    fn test_whitespace_only_text_kept_in_model() {
        let xml = slide(&text_shape(2, "Subtitle 2", &["  "]));
        let parsed = parse_slide_xml(&xml).unwrap();
        assert_eq!(texts(&parsed), vec![Some("  ")]);
    }

    #[test]
    fn test_empty_slide() {
        let parsed = parse_slide_xml(&slide("")).unwrap();
        assert!(parsed.shapes.is_empty());
    }
}
