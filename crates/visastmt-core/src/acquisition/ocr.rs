//! OCR strategy: rasterize each page and recognize it.

use tracing::debug;

use super::{AcquisitionStrategy, TextSource};
use crate::error::Result;
use crate::ocr::TextRecognizer;
use crate::pdf::{join_pages, PdfProcessor};

/// Renders every page and runs the recognizer on it, one page at a time.
pub struct OcrText<R> {
    recognizer: R,
    dpi: u32,
}

impl<R: TextRecognizer> OcrText<R> {
    /// Create the strategy. `dpi` sizes pages that carry no embedded scan.
    pub fn new(recognizer: R, dpi: u32) -> Self {
        Self { recognizer, dpi }
    }
}

impl<R: TextRecognizer> AcquisitionStrategy for OcrText<R> {
    fn source(&self) -> TextSource {
        TextSource::Ocr
    }

    fn extract(&self, pdf: &dyn PdfProcessor) -> Result<String> {
        let page_count = pdf.page_count();
        let mut pages = Vec::with_capacity(page_count as usize);

        for page in 1..=page_count {
            let image = pdf.render_page(page, self.dpi)?;
            let text = self.recognizer.recognize(&image)?;
            debug!("OCR page {}/{}: {} chars", page, page_count, text.len());
            pages.push(text);
        }

        Ok(join_pages(&pages))
    }
}
