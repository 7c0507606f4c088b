//! WASM bindings for mould transfer notice import.
//!
//! The browser extracts positioned text with its own PDF renderer and hands
//! either the fragments or the joined text to these functions.

use wasm_bindgen::prelude::*;

use mtn_core::diagnostics::{mask, NoticeDiagnostics};
use mtn_core::layout::PositionedFragment;
use mtn_core::models::config::{DiagnosticsConfig, LayoutConfig};
use mtn_core::models::notice::ParseReport;
use mtn_core::notice::{MouldTransferParser, NoticeParser};

/// Default clip length for masked snippets.
const MASK_LIMIT: usize = 220;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn fragments_from_js(pages: JsValue) -> Result<Vec<Vec<PositionedFragment>>, JsValue> {
    serde_wasm_bindgen::from_value(pages).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a notice from extracted text.
///
/// Returns a `ParseReport`: `{ status: "success", documentDate, rows, rawText }`
/// or `{ status: "failure", error, reason, rawText }`.
#[wasm_bindgen]
pub fn parse_notice_text(text: &str) -> Result<JsValue, JsValue> {
    let result = MouldTransferParser::new().parse_text(text);
    to_js(&ParseReport::from(&result))
}

/// Parse a notice from positioned fragments.
///
/// `pages` is an array of pages, each an array of `{ text, x, y, width }`.
#[wasm_bindgen]
pub fn parse_notice_fragments(pages: JsValue) -> Result<JsValue, JsValue> {
    let pages = fragments_from_js(pages)?;
    let result = MouldTransferParser::new().parse_fragments(&pages);
    to_js(&ParseReport::from(&result))
}

/// Mask digits and letters so text can be shared in bug reports.
#[wasm_bindgen]
pub fn mask_diagnostic(text: &str) -> String {
    mask(text, MASK_LIMIT)
}

/// Notice importer with configurable layout reconstruction.
#[wasm_bindgen]
pub struct NoticeImporter {
    layout: LayoutConfig,
    diagnostics: DiagnosticsConfig,
}

#[wasm_bindgen]
impl NoticeImporter {
    /// Create an importer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            layout: LayoutConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// Average glyph width used to turn gaps into spaces.
    #[wasm_bindgen]
    pub fn set_char_width(&mut self, char_width: f64) {
        self.layout.char_width = char_width;
    }

    /// Vertical tolerance for fragments sharing a line.
    #[wasm_bindgen]
    pub fn set_line_tolerance(&mut self, tolerance: f64) {
        self.layout.line_tolerance = tolerance;
    }

    fn parser(&self) -> MouldTransferParser {
        MouldTransferParser::new().with_layout(self.layout.clone())
    }

    /// Parse positioned fragments into a `ParseReport`.
    #[wasm_bindgen]
    pub fn parse(&self, pages: JsValue) -> Result<JsValue, JsValue> {
        let pages = fragments_from_js(pages)?;
        to_js(&ParseReport::from(&self.parser().parse_fragments(&pages)))
    }

    /// Masked diagnostic summary for extracted text.
    #[wasm_bindgen]
    pub fn diagnose(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser().parse_text(text);
        to_js(&NoticeDiagnostics::new(text, &result, &self.diagnostics))
    }
}

impl Default for NoticeImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a date written as `2024/1/5`, `2024-01-05` or `2024年1月5日`.
#[wasm_bindgen]
pub fn normalize_date(text: &str) -> Option<String> {
    mtn_core::notice::rules::parse_date(text).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Normalize a mould number such as `ML 0123 0271`.
#[wasm_bindgen]
pub fn normalize_mould_no(text: &str) -> String {
    mtn_core::notice::rules::normalize_mould_no(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_mask_diagnostic() {
        assert_eq!(mask_diagnostic("ML01230271 红旗"), "AA######## 红旗");
    }

    #[wasm_bindgen_test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2024年1月5日").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("待定"), None);
    }

    #[wasm_bindgen_test]
    fn test_normalize_mould_no() {
        assert_eq!(normalize_mould_no("ML 0123 0271"), "ML01230271");
    }

    #[wasm_bindgen_test]
    fn test_parse_notice_text_reports_failure() {
        let report = parse_notice_text("其他文件").unwrap();
        assert!(report.is_object());
    }
}
