//! Collects positioned text runs from the pdf-extract content stream walker.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::trace;

use crate::layout::PositionedFragment;

/// A run being accumulated between `begin_word` and `end_word`.
#[derive(Debug)]
struct OpenRun {
    text: String,
    x: f64,
    y: f64,
    /// Horizontal end of the last glyph.
    end_x: f64,
    /// Font size in device units, used to detect jumps inside a run.
    em: f64,
}

/// [`OutputDev`] that turns each shown text run into a [`PositionedFragment`].
///
/// A run is split when the next glyph jumps horizontally by more than one
/// em, which happens with kerned `TJ` arrays that lay out several cells.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    max_pages: usize,
    pages: Vec<Vec<PositionedFragment>>,
    current: Option<OpenRun>,
    skipping: bool,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore pages after the first `max_pages` (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Collected pages.
    pub fn into_pages(mut self) -> Vec<Vec<PositionedFragment>> {
        self.flush();
        self.pages
    }

    fn flush(&mut self) {
        let Some(run) = self.current.take() else {
            return;
        };
        if run.text.trim().is_empty() {
            return;
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(PositionedFragment::new(run.text, run.x, run.y, run.end_x - run.x));
        }
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.flush();
        self.skipping = self.max_pages > 0 && self.pages.len() >= self.max_pages;
        if self.skipping {
            trace!("Skipping page {}", page_num);
        } else {
            self.pages.push(Vec::new());
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        if self.skipping {
            return Ok(());
        }

        let x = trm.m31;
        let y = trm.m32;
        let scale = trm.m11.abs();
        let advance = width * font_size * scale;
        let em = (font_size * scale).max(1.0);

        let jumped = self
            .current
            .as_ref()
            .is_some_and(|run| x - run.end_x > run.em || (y - run.y).abs() > run.em / 2.0);
        if jumped {
            self.flush();
        }

        match self.current.as_mut() {
            Some(run) => {
                run.text.push_str(char);
                run.end_x = run.end_x.max(x + advance);
            }
            None => {
                self.current = Some(OpenRun {
                    text: char.to_string(),
                    x,
                    y,
                    end_x: x + advance,
                    em,
                });
            }
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
