//! Console text renderer.

use crate::model::{DocumentKind, ExtractionResult, Row, Section};
use crate::review::ReviewReport;

use super::options::RenderOptions;

/// Render one extraction result for console review.
pub fn to_text(result: &ExtractionResult, options: &RenderOptions) -> String {
    let mut output = String::new();

    let label = match result.kind {
        DocumentKind::WordDocument => "DOCUMENT",
        DocumentKind::SlideDeck => "PRESENTATION",
    };
    push_banner(&mut output, options);
    output.push_str(&format!("{}: {}\n", label, result.display_name()));
    push_banner(&mut output, options);

    if options.table_summary {
        let tables = result.tables().count();
        if tables > 0 {
            output.push_str(&format!("\nFound {} table(s):\n", tables));
        }
    }

    for section in &result.sections {
        match section {
            Section::Paragraph { index, text } => {
                output.push_str(&format!("Paragraph {}: {}\n", options.number(*index), text));
            }
            Section::Table { index, rows } => {
                output.push_str(&format!("\nTable {}:\n", options.number(*index)));
                for row in rows {
                    output.push_str("  ");
                    output.push_str(&render_row(row, options));
                    output.push('\n');
                }
            }
            Section::Slide { index, texts } => {
                if texts.is_empty() && !options.include_empty_slides {
                    continue;
                }
                output.push_str(&format!("\nSlide {}:\n", options.number(*index)));
                for text in texts {
                    output.push_str("  - ");
                    output.push_str(&indent_continuation(text, "    "));
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Render a batch review: every document in order, failures inline, then a summary.
pub fn review_to_text(report: &ReviewReport, options: &RenderOptions) -> String {
    let mut output = String::new();

    for outcome in &report.documents {
        match &outcome.result {
            Ok(result) => {
                output.push('\n');
                output.push_str(&to_text(result, options));
            }
            Err(e) => {
                output.push_str(&format!("\nError reading {}: {}\n", outcome.path.display(), e));
            }
        }
    }

    output.push('\n');
    push_banner(&mut output, options);
    output.push_str(&format!(
        "Review completed: {} document(s), {} failed\n",
        report.documents.len(),
        report.failed().count()
    ));
    push_banner(&mut output, options);

    output
}

fn push_banner(output: &mut String, options: &RenderOptions) {
    output.push_str(&"=".repeat(options.banner_width));
    output.push('\n');
}

fn render_row(row: &Row, options: &RenderOptions) -> String {
    row.cells
        .iter()
        .map(|cell| cell.replace('\n', " "))
        .collect::<Vec<_>>()
        .join(&options.cell_separator)
}

/// Indent every line after the first so multi-line texts stay under their bullet.
fn indent_continuation(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{}", indent))
}
