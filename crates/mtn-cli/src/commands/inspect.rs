//! Inspect command - masked diagnostics for notices that fail to import.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::warn;

use mtn_core::diagnostics::NoticeDiagnostics;
use mtn_core::notice::MouldTransferParser;

use super::input::{load_config, NoticeSource};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Notice files (PDF or text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print one JSON object per file
    #[arg(long)]
    json: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let parser = MouldTransferParser::new().with_layout(config.layout.clone());

    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let source = match NoticeSource::load(path, &config) {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                if !args.json {
                    println!("\n=== {} ===", name);
                    println!("{} {}", style("load error:").red(), e);
                }
                continue;
            }
        };

        let text = source.text(&config);
        let result = source.parse(&parser);
        let diagnostics = NoticeDiagnostics::new(&text, &result, &config.diagnostics);

        if args.json {
            println!("{}", serde_json::to_string(&diagnostics)?);
        } else {
            println!("\n=== {} ===", name);
            println!("{}", diagnostics);
        }
    }

    Ok(())
}
