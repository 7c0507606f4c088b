//! Batch import of notice files matched by a glob.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use mtn_core::error::ParseFailure;
use mtn_core::models::notice::MouldTransferNotice;
use mtn_core::notice::MouldTransferParser;

use super::input::{is_supported, load_config, NoticeSource};
use super::parse::{format_notice, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for .pdf/.txt notices
    #[arg(required = true)]
    input: String,

    /// Directory for one output file per imported notice
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Keep going when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// What happened to one file.
enum Outcome {
    Imported(MouldTransferNotice),
    /// Readable, but not an importable notice.
    Rejected(ParseFailure),
    Unreadable(String),
}

impl Outcome {
    fn status(&self) -> &'static str {
        match self {
            Self::Imported(_) => "imported",
            Self::Rejected(_) => "rejected",
            Self::Unreadable(_) => "unreadable",
        }
    }

    fn error(&self) -> String {
        match self {
            Self::Imported(_) => String::new(),
            Self::Rejected(failure) => failure.reason(),
            Self::Unreadable(e) => e.clone(),
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to import", style("ℹ").blue(), files.len());

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );

    let parser = MouldTransferParser::new().with_layout(config.layout.clone());
    let mut outcomes: Vec<(PathBuf, Outcome)> = Vec::with_capacity(files.len());

    for path in files {
        pb.set_message(file_name(&path).to_string());

        let outcome = match NoticeSource::load(&path, &config) {
            Ok(source) => match source.parse(&parser) {
                Ok(notice) => Outcome::Imported(notice),
                Err(failure) => Outcome::Rejected(failure),
            },
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                Outcome::Unreadable(e.to_string())
            }
            Err(e) => {
                pb.abandon();
                return Err(e.context(format!("Failed to read {}", path.display())));
            }
        };

        if let (Outcome::Imported(notice), Some(dir)) = (&outcome, &args.output_dir) {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("notice");
            let output_path = dir.join(format!("{}.{}", stem, args.format.extension()));
            fs::write(&output_path, format_notice(notice, args.format)?)?;
            debug!("Wrote {}", output_path.display());
        }

        outcomes.push((path, outcome));
        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or(Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let imported = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, Outcome::Imported(_)))
        .count();
    println!(
        "{} Imported {} of {} notices",
        style("✓").green(),
        imported,
        outcomes.len()
    );

    let not_imported = outcomes
        .iter()
        .filter(|(_, o)| !matches!(o, Outcome::Imported(_)));
    for (path, outcome) in not_imported {
        println!(
            "  {} {} ({}): {}",
            style("✗").red(),
            file_name(path),
            outcome.status(),
            outcome.error()
        );
    }

    Ok(())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}

/// One line per file: filename, status, document_date, rows, error.
fn write_summary(path: &Path, outcomes: &[(PathBuf, Outcome)]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["filename", "status", "document_date", "rows", "error"])?;

    for (file, outcome) in outcomes {
        let (date, rows) = match outcome {
            Outcome::Imported(notice) => (
                notice.document_date.format("%Y-%m-%d").to_string(),
                notice.rows.len().to_string(),
            ),
            _ => (String::new(), String::new()),
        };
        let error = outcome.error();
        wtr.write_record([
            file_name(file),
            outcome.status(),
            date.as_str(),
            rows.as_str(),
            error.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
