//! Shared input loading for notice files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use mtn_core::layout::{LayoutReconstructor, PositionedFragment};
use mtn_core::models::config::MtnConfig;
use mtn_core::models::notice::ParseResult;
use mtn_core::notice::{MouldTransferParser, NoticeParser};
use mtn_core::pdf::{FragmentSource, PdfExtractor};

use super::config::default_config_path;

/// File extensions accepted as notice input.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Content loaded from a notice file.
pub enum NoticeSource {
    /// Positioned fragments from a PDF, one list per page.
    Fragments(Vec<Vec<PositionedFragment>>),
    /// Already extracted text.
    Text(String),
}

impl NoticeSource {
    /// Load a PDF or text file.
    pub fn load(path: &Path, config: &MtnConfig) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }

        match extension(path).as_str() {
            "pdf" => {
                let mut extractor = PdfExtractor::new().with_config(config.pdf.clone());
                extractor.load_file(path)?;
                debug!("PDF has {} pages", extractor.page_count());

                let pages = extractor.extract_fragments()?;
                if pages.iter().all(Vec::is_empty) {
                    anyhow::bail!("No text could be extracted from the PDF");
                }
                Ok(Self::Fragments(pages))
            }
            "txt" => Ok(Self::Text(fs::read_to_string(path)?)),
            other => anyhow::bail!("Unsupported file format: {}", other),
        }
    }

    /// Text as the parser sees it before normalization.
    pub fn text(&self, config: &MtnConfig) -> String {
        match self {
            Self::Fragments(pages) => LayoutReconstructor::new(config.layout.clone())
                .reconstruct(pages)
                .to_text(),
            Self::Text(text) => text.clone(),
        }
    }

    pub fn parse(&self, parser: &MouldTransferParser) -> ParseResult {
        match self {
            Self::Fragments(pages) => parser.parse_fragments(pages),
            Self::Text(text) => parser.parse_text(text),
        }
    }
}

/// Lowercased file extension, empty when missing.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MtnConfig> {
    if let Some(path) = config_path {
        return Ok(MtnConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        info!("Using configuration from {}", default_path.display());
        return Ok(MtnConfig::from_file(&default_path)?);
    }

    Ok(MtnConfig::default())
}
