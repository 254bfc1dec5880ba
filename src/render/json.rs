//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::ExtractionResult;
use crate::review::ReviewReport;
use serde::Serialize;
use std::path::Path;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(value),
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
    };
    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert an extraction result to JSON.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    serialize(result, format)
}

#[derive(Serialize)]
struct ReviewEntry<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Convert a batch review to a JSON array, one entry per document.
///
/// Failed documents carry an `error` message instead of a `result`.
pub fn review_to_json(report: &ReviewReport, format: JsonFormat) -> Result<String> {
    let entries: Vec<ReviewEntry<'_>> = report
        .documents
        .iter()
        .map(|outcome| ReviewEntry {
            path: &outcome.path,
            result: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(ToString::to_string),
        })
        .collect();
    serialize(&entries, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::model::{DocumentKind, Row, Section};
    use crate::review::DocumentOutcome;
    use std::path::PathBuf;

    fn sample() -> ExtractionResult {
        let mut result = ExtractionResult::new(DocumentKind::WordDocument, "a.docx");
        result.sections.push(Section::Paragraph {
            index: 0,
            text: "Hello".into(),
        });
        result.sections.push(Section::Table {
            index: 0,
            rows: vec![Row::new(vec!["x".into()])],
        });
        result
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"kind\": \"word_document\""));
        assert!(json.contains("\"type\": \"Paragraph\""));
        assert!(json.contains("\"text\": \"Hello\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"source_path\":\"a.docx\""));
    }

    #[test]
    fn test_result_roundtrip() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        let parsed: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_review_to_json() {
        let report = ReviewReport {
            documents: vec![
                DocumentOutcome {
                    path: PathBuf::from("a.docx"),
                    result: Ok(sample()),
                },
                DocumentOutcome {
                    path: PathBuf::from("b.pptx"),
                    result: Err(Error::load("b.pptx", LoadError::LegacyFormat)),
                },
            ],
        };

        let json = review_to_json(&report, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["result"]["kind"], "word_document");
        assert!(entries[0].get("error").is_none());
        assert_eq!(entries[1]["path"], "b.pptx");
        assert!(entries[1]["error"].as_str().unwrap().contains("Legacy or encrypted"));
    }
}
