//! Slide deck model.

use serde::{Deserialize, Serialize};

/// Kind of a shape in a slide's shape tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `p:sp`: text boxes, titles, placeholders, drawn shapes.
    #[default]
    AutoShape,
    /// `p:grpSp`
    Group,
    /// `p:pic`
    Picture,
    /// `p:graphicFrame`: tables, charts, diagrams.
    GraphicFrame,
    /// `p:cxnSp`
    Connector,
    /// `p:contentPart`: ink.
    ContentPart,
}

impl ShapeKind {
    /// Map a shape-tree element local name to a shape kind.
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(ShapeKind::AutoShape),
            b"grpSp" => Some(ShapeKind::Group),
            b"pic" => Some(ShapeKind::Picture),
            b"graphicFrame" => Some(ShapeKind::GraphicFrame),
            b"cxnSp" => Some(ShapeKind::Connector),
            b"contentPart" => Some(ShapeKind::ContentPart),
            _ => None,
        }
    }

    /// Whether shapes of this kind expose a text value.
    pub fn has_text(&self) -> bool {
        matches!(self, ShapeKind::AutoShape)
    }
}

/// A shape on a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Shape id from `cNvPr`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    /// Shape name from `cNvPr`.
    #[serde(default)]
    pub name: String,

    /// Shape kind.
    pub kind: ShapeKind,

    /// Text value, for shapes that expose one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Shape {
    /// Create a text-bearing shape.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            kind: ShapeKind::AutoShape,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a shape that exposes no text.
    pub fn without_text(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

/// A slide: its shapes in z-order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Top-level shapes of the slide.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a slide from shapes.
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }
}

/// An in-memory presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}
