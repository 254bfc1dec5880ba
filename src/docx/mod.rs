//! DOCX (Word) document loader.
//!
//! Reads body paragraphs and body tables from Word documents in the
//! Office Open XML (.docx) format.

mod parser;

pub use parser::{parse_document_xml, DocxParser};
