//! Error types for the visastmt-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::acquisition::TextSource;

/// Main error type for the visastmt library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Transaction extraction outcome that produced nothing to write.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// CSV output error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`StatementError`], one per user-facing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input document could not be opened or parsed.
    UnreadableInput,
    /// The rasterizer or OCR engine could not be used.
    RenderingUnavailable,
    /// Every acquisition strategy produced blank text.
    NoText,
    /// Text was acquired but contained no transactions.
    NoTransactions,
    /// The destination could not be written.
    WriteFailure,
    /// Invalid configuration or other internal failure.
    Config,
}

impl StatementError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatementError::Pdf(PdfError::ImageExtraction(_)) => ErrorKind::RenderingUnavailable,
            StatementError::Pdf(_) => ErrorKind::UnreadableInput,
            StatementError::Ocr(_) => ErrorKind::RenderingUnavailable,
            StatementError::Extraction(ExtractionError::NoText { .. }) => ErrorKind::NoText,
            StatementError::Extraction(ExtractionError::NoTransactions { .. }) => {
                ErrorKind::NoTransactions
            }
            StatementError::Output(_) => ErrorKind::WriteFailure,
            StatementError::Io(_) | StatementError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file could not be read from disk.
    #[error("cannot read document {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the PDF structure.
    #[error("cannot read document: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("cannot read document: PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("cannot read document: PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// Failed to decode the native text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Page images exist but none could be decoded for rendering.
    #[error("rendering unavailable: {0}")]
    ImageExtraction(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No OCR engine is compiled into this build.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Extraction outcomes that leave nothing to write.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Both native and OCR acquisition produced blank text.
    #[error("failed to extract text from the PDF (last tried: {strategy})")]
    NoText { strategy: TextSource },

    /// Text was acquired but the transaction pattern matched nothing.
    #[error("no transactions found in {chars} characters of extracted text")]
    NoTransactions { chars: usize },
}

/// Errors related to writing the CSV file.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The configured delimiter is not a single ASCII character.
    #[error("invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(char),

    /// Failed to create, write or replace the destination.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for the visastmt library.
pub type Result<T> = std::result::Result<T, StatementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_separates_input_from_rendering() {
        let unreadable = StatementError::from(PdfError::Parse("bad xref".to_string()));
        assert_eq!(unreadable.kind(), ErrorKind::UnreadableInput);

        let undecodable = StatementError::from(PdfError::ImageExtraction("JBIG2".to_string()));
        assert_eq!(undecodable.kind(), ErrorKind::RenderingUnavailable);

        let models = StatementError::from(OcrError::ModelLoad("missing det.onnx".to_string()));
        assert_eq!(models.kind(), ErrorKind::RenderingUnavailable);
    }

    #[test]
    fn test_kind_separates_no_text_from_no_transactions() {
        let no_text = StatementError::from(ExtractionError::NoText {
            strategy: TextSource::Ocr,
        });
        let none_found = StatementError::from(ExtractionError::NoTransactions { chars: 12 });

        assert_eq!(no_text.kind(), ErrorKind::NoText);
        assert_eq!(none_found.kind(), ErrorKind::NoTransactions);
    }
}
