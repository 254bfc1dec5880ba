//! Output rendering for extraction results.
//!
//! Extraction never prints; these renderers turn an
//! [`ExtractionResult`](crate::ExtractionResult) or a batch
//! [`ReviewReport`](crate::review::ReviewReport) into console text or JSON.
//!
//! # Example
//!
//! ```no_run
//! use docreview::{extract_path, render::*};
//!
//! let result = extract_path("document.docx")?;
//!
//! // Render for the console
//! let text = to_text(&result, &RenderOptions::default());
//!
//! // Render to JSON
//! let json = to_json(&result, JsonFormat::Pretty)?;
//! # Ok::<(), docreview::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::{review_to_json, to_json, JsonFormat};
pub use options::RenderOptions;
pub use text::{review_to_text, to_text};
