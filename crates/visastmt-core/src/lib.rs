//! Core library for Bankinter VISA statement conversion.
//!
//! This crate provides:
//! - PDF processing (native text layer and page rasterization)
//! - OCR fallback for scanned statements using pure-onnx-ocr
//! - Structural extraction of transaction rows
//! - CSV output with a fixed header

pub mod acquisition;
pub mod convert;
pub mod error;
pub mod models;
pub mod ocr;
pub mod output;
pub mod pdf;
pub mod statement;

#[cfg(test)]
pub(crate) mod testutil;

pub use acquisition::{extract_native, extract_via_ocr, AcquiredText, TextAcquirer, TextSource};
pub use convert::{convert_pdf_to_csv, ConversionReport, Converter};
pub use error::{ErrorKind, StatementError, Result};
pub use models::config::StatementConfig;
pub use models::transaction::Transaction;
pub use ocr::{LazyOcrEngine, TextRecognizer};
pub use output::{write_transactions, CsvOutput};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use statement::{extract_transactions, StatementSummary};
