//! Line reconstruction from positioned text fragments.
//!
//! PDF text extraction yields glyph runs with coordinates but no table grid.
//! Fragments are grouped into lines by vertical proximity and each line is
//! rendered with whitespace proportional to the horizontal gaps, so that wide
//! column gaps survive as runs of spaces.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::models::config::LayoutConfig;

/// One glyph run on a page, in PDF user space (y grows upward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    pub text: String,
    #[serde(default = "missing_coordinate")]
    pub x: f64,
    #[serde(default = "missing_coordinate")]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
        }
    }

    fn has_finite_geometry(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}

/// Fragments sharing an approximate vertical position.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Vertical position of the fragment that opened the line.
    pub y: f64,
    /// Fragments in insertion order.
    pub fragments: Vec<PositionedFragment>,
}

impl TextLine {
    /// Render the line, approximating column spacing from horizontal gaps.
    pub fn render(&self, config: &LayoutConfig) -> String {
        let mut sorted: Vec<&PositionedFragment> = self.fragments.iter().collect();
        sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let mut out = String::new();
        let mut prev: Option<&PositionedFragment> = None;

        for cur in sorted {
            let text = collapse_whitespace(&cur.text);
            if text.is_empty() {
                continue;
            }

            if let Some(p) = prev {
                let gap = cur.x - (p.x + p.width);
                let spaces = if gap > 0.0 {
                    gap_to_spaces(gap, config)
                } else {
                    1
                };
                out.extend(std::iter::repeat_n(' ', spaces));
            }

            out.push_str(&text);
            prev = Some(cur);
        }

        out.trim_end().to_string()
    }
}

fn gap_to_spaces(gap: f64, config: &LayoutConfig) -> usize {
    let max = config.max_gap_spaces.max(1);
    if config.char_width <= 0.0 {
        return max;
    }
    let raw = (gap / config.char_width).floor();
    if raw < 1.0 {
        1
    } else if raw >= max as f64 {
        max
    } else {
        raw as usize
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reconstructed text of a whole document: rendered lines per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    pages: Vec<Vec<String>>,
}

impl DocumentText {
    /// Rendered pages, each a list of non-blank lines.
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    /// All lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// Join pages with a blank line between them.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Groups fragments into lines and renders them.
#[derive(Debug, Clone, Default)]
pub struct LayoutReconstructor {
    config: LayoutConfig,
}

impl LayoutReconstructor {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Group a page's fragments into lines, top of the page first.
    pub fn group_lines(&self, fragments: &[PositionedFragment]) -> Vec<TextLine> {
        let mut lines: Vec<TextLine> = Vec::new();

        for fragment in fragments {
            if !fragment.has_finite_geometry() {
                trace!("Skipping fragment with non-finite geometry: {:?}", fragment.text);
                continue;
            }

            match lines
                .iter_mut()
                .find(|l| (l.y - fragment.y).abs() <= self.config.line_tolerance)
            {
                Some(line) => line.fragments.push(fragment.clone()),
                None => lines.push(TextLine {
                    y: fragment.y,
                    fragments: vec![fragment.clone()],
                }),
            }
        }

        lines.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));
        lines
    }

    /// Render one page into non-blank lines.
    pub fn reconstruct_page(&self, fragments: &[PositionedFragment]) -> Vec<String> {
        self.group_lines(fragments)
            .iter()
            .map(|line| line.render(&self.config))
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// Render all pages in order.
    pub fn reconstruct(&self, pages: &[Vec<PositionedFragment>]) -> DocumentText {
        let pages: Vec<Vec<String>> = pages
            .iter()
            .map(|fragments| self.reconstruct_page(fragments))
            .collect();

        let doc = DocumentText { pages };
        debug!(
            "Reconstructed {} lines from {} pages",
            doc.line_count(),
            doc.pages.len()
        );
        doc
    }
}
