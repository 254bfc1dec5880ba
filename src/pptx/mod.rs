//! PPTX (PowerPoint) presentation loader.
//!
//! Reads slides and their top-level shapes from PowerPoint presentations
//! in the Office Open XML (.pptx) format.

mod parser;

pub use parser::{parse_slide_xml, PptxParser};
