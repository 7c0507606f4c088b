//! Parse command - import a single notice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use mtn_core::models::notice::{MouldTransferNotice, ParseReport, ParseResult};
use mtn_core::notice::MouldTransferParser;

use super::input::{load_config, NoticeSource};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one line per row
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Loading notice...");

    let source = NoticeSource::load(&args.input, &config)?;

    pb.set_message("Recovering table rows...");
    let parser = MouldTransferParser::new().with_layout(config.layout.clone());
    let result = source.parse(&parser);
    pb.finish_and_clear();

    let notice = match result {
        Ok(notice) => notice,
        Err(failure) => anyhow::bail!(
            "{} is not importable: {}",
            args.input.display(),
            failure.reason()
        ),
    };

    let output = format_notice(&notice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_notice(notice: &MouldTransferNotice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let result: ParseResult = Ok(notice.clone());
            Ok(serde_json::to_string(&ParseReport::from(&result))?)
        }
        OutputFormat::Csv => format_csv(notice),
        OutputFormat::Text => Ok(format_text(notice)),
    }
}

fn format_csv(notice: &MouldTransferNotice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let date = notice.document_date.format("%Y-%m-%d").to_string();

    wtr.write_record([
        "document_date",
        "index",
        "part_no",
        "mould_name",
        "mould_no",
        "mould_factory",
        "move_to",
        "seal_sample_no",
    ])?;

    for row in &notice.rows {
        wtr.write_record([
            date.as_str(),
            &row.index.to_string(),
            &row.part_no,
            &row.mould_name,
            &row.mould_no,
            &row.mould_factory,
            &row.move_to,
            &row.seal_sample_no,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(notice: &MouldTransferNotice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Mould move date: {}\n", notice.document_date.format("%Y-%m-%d")));
    output.push_str(&format!("Rows: {}\n", notice.rows.len()));

    for row in &notice.rows {
        output.push('\n');
        output.push_str(&format!("{}. {} {}\n", row.index, row.part_no, row.mould_name));
        output.push_str(&format!("   Mould:   {}\n", row.mould_no));
        output.push_str(&format!("   Factory: {}\n", row.mould_factory));
        output.push_str(&format!("   Move to: {}\n", row.move_to));
        output.push_str(&format!("   Seal:    {}\n", row.seal_sample_no));
    }

    output
}
