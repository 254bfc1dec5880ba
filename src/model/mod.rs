//! Document models and extraction output.
//!
//! The loaders convert Office Open XML parts into [`WordDocument`] and
//! [`SlideDeck`]; the extractor turns those into an [`ExtractionResult`].

mod result;
mod slides;
mod word;

pub use result::*;
pub use slides::*;
pub use word::*;
