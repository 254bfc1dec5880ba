//! docreview CLI - review text from Word and PowerPoint documents
//!
//! A command-line tool for printing the paragraphs, tables and slide text
//! of DOCX and PPTX files, one document or a whole directory at a time.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use docreview::render::{self, JsonFormat, RenderOptions};
use docreview::review::{self, ReviewConfig};
use docreview::DocumentKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Word and PowerPoint text extraction for manual review
#[derive(Parser)]
#[command(
    name = "docreview",
    author = "iyulab",
    version,
    about = "Print the text of Word and PowerPoint documents for review",
    long_about = "docreview - Text extraction from Office documents for manual review.\n\n\
                  Prints body paragraphs and tables of DOCX files and the shape text of \
                  PPTX slides, as console text or JSON."
)]
struct Cli {
    /// Verbose logging (overrides the default `warn` filter; RUST_LOG still applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every document in a directory
    Review {
        /// Directory containing .docx and .pptx files
        dir: PathBuf,

        /// Include subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a table count before each document's tables
        #[arg(long)]
        table_summary: bool,
    },

    /// Extract a single document
    Show {
        /// Input file path
        input: PathBuf,

        /// Document kind (docx, pptx); inferred from the extension by default
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<DocumentKind>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a table count before the tables
        #[arg(long)]
        table_summary: bool,
    },

    /// Detect the kind of a document from its content
    Kind {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Output format
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Console text
    Text,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
}

fn parse_kind(value: &str) -> Result<DocumentKind, docreview::Error> {
    value.parse()
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Review {
            dir,
            recursive,
            format,
            output,
            table_summary,
        } => {
            let config = ReviewConfig::new(&dir).with_recursive(recursive);
            let files = review::scan_directory(&config)?;

            if files.is_empty() {
                println!(
                    "{} No .docx or .pptx files found in {}",
                    "!".yellow().bold(),
                    dir.display()
                );
                return Ok(());
            }

            log::info!("reviewing {} document(s) in {}", files.len(), dir.display());
            let pb = create_progress(files.len() as u64);
            let report = review::review_files_with(files, |path| {
                pb.set_message(file_label(path));
                pb.inc(1);
            });
            pb.finish_and_clear();

            let options = RenderOptions::new().with_table_summary(table_summary);
            let content = match format {
                OutputFormat::Text => render::review_to_text(&report, &options),
                OutputFormat::Json => render::review_to_json(&report, JsonFormat::Pretty)?,
                OutputFormat::JsonCompact => {
                    render::review_to_json(&report, JsonFormat::Compact)?
                }
            };
            write_output(output.as_ref(), &content)?;

            let failed = report.failed().count();
            if failed > 0 {
                eprintln!(
                    "{} {} of {} document(s) could not be read",
                    "!".yellow().bold(),
                    failed,
                    report.len()
                );
            }
            if let Some(path) = output {
                println!(
                    "{} Reviewed {} document(s): {}",
                    "✓".green().bold(),
                    report.len(),
                    path.display()
                );
            }
        }

        Commands::Show {
            input,
            kind,
            format,
            output,
            table_summary,
        } => {
            let pb = create_spinner("Extracting document...");

            let result = match kind {
                Some(kind) => docreview::extract_file(&input, kind),
                None => docreview::extract_path(&input),
            };
            pb.finish_and_clear();
            let result = result?;

            let options = RenderOptions::new().with_table_summary(table_summary);
            let content = match format {
                OutputFormat::Text => render::to_text(&result, &options),
                OutputFormat::Json => render::to_json(&result, JsonFormat::Pretty)?,
                OutputFormat::JsonCompact => render::to_json(&result, JsonFormat::Compact)?,
            };
            write_output(output.as_ref(), &content)?;

            if let Some(path) = output {
                println!(
                    "{} Extracted {}: {}",
                    "✓".green().bold(),
                    result.display_name(),
                    path.display()
                );
            }
        }

        Commands::Kind { input } => {
            let kind = docreview::detect_kind_from_path(&input)?;
            println!(
                "{}: {} (.{})",
                file_label(&input).bold(),
                kind,
                kind.extension()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "docreview".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Text extraction from Office documents for manual review");
    println!();
    println!("Supported formats: DOCX, PPTX");
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
