//! Text acquisition: native text layer first, OCR as a full replacement.

mod native;
mod ocr;

pub use native::NativeText;
pub use ocr::OcrText;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StatementError};
use crate::ocr::TextRecognizer;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Which strategy produced the acquired text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    /// Embedded text layer.
    Native,
    /// Optical character recognition over rendered pages.
    Ocr,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Native => write!(f, "native text"),
            TextSource::Ocr => write!(f, "OCR"),
        }
    }
}

/// One way of turning a document into text.
pub trait AcquisitionStrategy {
    /// Label for logs and reports.
    fn source(&self) -> TextSource;

    /// Produce the text of the whole document, pages in order.
    fn extract(&self, pdf: &dyn PdfProcessor) -> Result<String>;
}

/// Text acquired from a document.
#[derive(Debug, Clone)]
pub struct AcquiredText {
    /// Concatenated page text. May be blank.
    pub text: String,
    /// Strategy that produced `text`.
    pub source: TextSource,
    /// Number of pages in the document.
    pub pages: u32,
}

impl AcquiredText {
    /// Whether the text contains anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered list of strategies, tried until one yields non-blank text.
#[derive(Default)]
pub struct TextAcquirer<'a> {
    strategies: Vec<Box<dyn AcquisitionStrategy + 'a>>,
}

impl<'a> TextAcquirer<'a> {
    /// Create an acquirer with no strategies.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy; it runs only if every earlier one yields blank text.
    pub fn with_strategy(mut self, strategy: impl AcquisitionStrategy + 'a) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Number of configured strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategies are configured.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the strategies in order.
    ///
    /// The first non-blank result wins. If every strategy comes back blank,
    /// the last one's (blank) text is returned and the caller decides.
    pub fn acquire(&self, pdf: &dyn PdfProcessor) -> Result<AcquiredText> {
        let pages = pdf.page_count();
        let mut last = None;

        for strategy in &self.strategies {
            let source = strategy.source();
            info!("Extracting text using {}", source);

            let acquired = AcquiredText {
                text: strategy.extract(pdf)?,
                source,
                pages,
            };
            if !acquired.is_blank() {
                debug!("{} produced {} chars", source, acquired.text.len());
                return Ok(acquired);
            }

            info!("No text found with {}", source);
            last = Some(acquired);
        }

        last.ok_or_else(|| StatementError::Config("no text acquisition strategies".to_string()))
    }
}

/// Extract the embedded text layer of the PDF at `path`.
///
/// Returns an empty string for scanned documents.
pub fn extract_native(path: &Path) -> Result<String> {
    let pdf = PdfExtractor::open(path)?;
    NativeText.extract(&pdf)
}

/// Render every page of the PDF at `path` and recognize it.
pub fn extract_via_ocr<R: TextRecognizer>(path: &Path, recognizer: R, dpi: u32) -> Result<String> {
    let pdf = PdfExtractor::open(path)?;
    OcrText::new(recognizer, dpi).extract(&pdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakePdf, PanickingRecognizer, StubRecognizer};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_native_text_skips_ocr() {
        let pdf = FakePdf::with_text(&["01/03/2024 1234 SHOP 1,00 \n"]);
        let acquirer = TextAcquirer::new()
            .with_strategy(NativeText)
            .with_strategy(OcrText::new(PanickingRecognizer, 300));

        let acquired = acquirer.acquire(&pdf).unwrap();

        assert_eq!(acquired.source, TextSource::Native);
        assert_eq!(acquired.text, "01/03/2024 1234 SHOP 1,00 \n");
        assert!(pdf.rendered_pages().is_empty());
    }

    #[test]
    fn test_blank_native_falls_back_to_ocr_per_page_in_order() {
        let pdf = FakePdf::scanned(3);
        let recognizer = StubRecognizer::new();
        let acquirer = TextAcquirer::new()
            .with_strategy(NativeText)
            .with_strategy(OcrText::new(&recognizer, 300));

        let acquired = acquirer.acquire(&pdf).unwrap();

        assert_eq!(acquired.source, TextSource::Ocr);
        assert_eq!(acquired.pages, 3);
        assert_eq!(pdf.rendered_pages(), vec![1, 2, 3]);
        assert_eq!(recognizer.calls(), vec![1, 2, 3]);
        assert_eq!(acquired.text, "page 1\npage 2\npage 3");
    }

    #[test]
    fn test_whitespace_only_native_counts_as_blank() {
        let pdf = FakePdf::with_text(&[" \n", "\t\n"]);
        let recognizer = StubRecognizer::new();
        let acquirer = TextAcquirer::new()
            .with_strategy(NativeText)
            .with_strategy(OcrText::new(&recognizer, 300));

        let acquired = acquirer.acquire(&pdf).unwrap();

        assert_eq!(acquired.source, TextSource::Ocr);
        assert_eq!(recognizer.calls(), vec![1, 2]);
    }

    #[test]
    fn test_all_blank_returns_last_blank_result() {
        let pdf = FakePdf::scanned(2);
        let recognizer = StubRecognizer::blank();
        let acquirer = TextAcquirer::new()
            .with_strategy(NativeText)
            .with_strategy(OcrText::new(&recognizer, 300));

        let acquired = acquirer.acquire(&pdf).unwrap();

        assert!(acquired.is_blank());
        assert_eq!(acquired.source, TextSource::Ocr);
        assert_eq!(recognizer.calls(), vec![1, 2]);
    }

    #[test]
    fn test_no_strategies_is_a_config_error() {
        let pdf = FakePdf::scanned(1);
        let err = TextAcquirer::new().acquire(&pdf).unwrap_err();
        assert!(matches!(err, StatementError::Config(_)));
    }

    #[test]
    fn test_extract_native_missing_file() {
        let err = extract_native(Path::new("/nonexistent/statement.pdf")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnreadableInput);
    }
}
