//! Native text layer strategy.

use super::{AcquisitionStrategy, TextSource};
use crate::error::Result;
use crate::pdf::PdfProcessor;

/// Reads the text embedded in the PDF content streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeText;

impl AcquisitionStrategy for NativeText {
    fn source(&self) -> TextSource {
        TextSource::Native
    }

    fn extract(&self, pdf: &dyn PdfProcessor) -> Result<String> {
        Ok(pdf.extract_text()?)
    }
}
