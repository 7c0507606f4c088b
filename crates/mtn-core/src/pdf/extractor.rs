//! PDF fragment extraction using pdf-extract.

use pdf_extract::Document;
use tracing::debug;

use super::collector::FragmentCollector;
use super::{FragmentSource, Result};
use crate::error::{MtnError, PdfError};
use crate::layout::PositionedFragment;
use crate::models::config::PdfConfig;

/// PDF fragment extractor.
pub struct PdfExtractor {
    config: PdfConfig,
    document: Option<Document>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            config: PdfConfig::default(),
            document: None,
        }
    }

    /// Set loading configuration.
    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Load a PDF file from disk.
    pub fn load_file(&mut self, path: &std::path::Path) -> crate::error::Result<()> {
        let data = std::fs::read(path)?;
        self.load(&data).map_err(MtnError::from)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt(self.config.password.as_str()).is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_fragments(&self) -> Result<Vec<Vec<PositionedFragment>>> {
        let doc = self.document()?;

        let mut collector = FragmentCollector::new().with_max_pages(self.config.max_pages);
        pdf_extract::output_doc(doc, &mut collector)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let pages = collector.into_pages();
        debug!(
            "Collected {} fragments from {} pages",
            pages.iter().map(Vec::len).sum::<usize>(),
            pages.len()
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::default();
        assert!(matches!(extractor.extract_fragments(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let mut extractor = PdfExtractor::new().with_config(PdfConfig::default());
        assert!(matches!(
            extractor.load("美菱移模通知单 plain text".as_bytes()),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_load_file_errors() {
        let dir = std::env::temp_dir().join(format!("mtn-pdf-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let fake = dir.join("fake.pdf");
        std::fs::write(&fake, "not a pdf").unwrap();

        let mut extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.load_file(&dir.join("missing.pdf")),
            Err(MtnError::Io(_))
        ));
        assert!(matches!(
            extractor.load_file(&fake),
            Err(MtnError::Pdf(PdfError::Parse(_)))
        ));
        assert_eq!(extractor.page_count(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
