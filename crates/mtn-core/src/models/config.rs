//! Configuration structures for the notice pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MtnError, Result};

/// Main configuration for the mtn pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MtnConfig {
    /// Line reconstruction from positioned fragments.
    pub layout: LayoutConfig,

    /// PDF loading configuration.
    pub pdf: PdfConfig,

    /// Masked diagnostic output.
    pub diagnostics: DiagnosticsConfig,
}

/// Layout reconstruction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance for a fragment to join an existing line.
    pub line_tolerance: f64,

    /// Average character width used to turn horizontal gaps into spaces.
    pub char_width: f64,

    /// Upper bound on spaces inserted for a single gap.
    pub max_gap_spaces: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.5,
            char_width: 8.0,
            max_gap_spaces: 10,
        }
    }
}

/// PDF loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Password tried for encrypted documents.
    pub password: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            password: String::new(),
        }
    }
}

/// Diagnostic summary configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Number of sample rows printed per document.
    pub sample_rows: usize,

    /// Characters kept before a marker in context snippets.
    pub context_before: usize,

    /// Characters kept after a marker in context snippets.
    pub context_after: usize,

    /// Maximum characters of any masked snippet.
    pub mask_limit: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            sample_rows: 2,
            context_before: 40,
            context_after: 120,
            mask_limit: 220,
        }
    }
}

impl MtnConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| MtnError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| MtnError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
