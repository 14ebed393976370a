//! End-to-end conversion: acquire text, extract transactions, write CSV.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::acquisition::{NativeText, OcrText, TextAcquirer, TextSource};
use crate::error::{ExtractionError, Result, StatementError};
use crate::models::config::StatementConfig;
use crate::models::transaction::Transaction;
use crate::ocr::LazyOcrEngine;
use crate::output::CsvOutput;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::statement::{StatementSummary, TransactionExtractor};

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Strategy that produced the text.
    pub source: TextSource,
    /// Number of pages in the document.
    pub pages: u32,
    /// Transactions written, in statement order.
    pub transactions: Vec<Transaction>,
    /// Totals over `transactions`.
    pub summary: StatementSummary,
    /// File that was written.
    pub output: PathBuf,
}

/// Statement-to-CSV converter.
pub struct Converter<'a> {
    acquirer: TextAcquirer<'a>,
    extractor: TransactionExtractor,
    output: CsvOutput,
}

impl<'a> Converter<'a> {
    /// Create a converter from its parts.
    pub fn new(acquirer: TextAcquirer<'a>, output: CsvOutput) -> Self {
        Self {
            acquirer,
            extractor: TransactionExtractor::new(),
            output,
        }
    }

    /// Native text first, then OCR with models from the configuration
    /// unless `pdf.ocr_fallback` is off.
    pub fn from_config(config: &StatementConfig) -> Result<Self> {
        let mut acquirer = TextAcquirer::new().with_strategy(NativeText);
        if config.pdf.ocr_fallback {
            acquirer = acquirer.with_strategy(OcrText::new(
                LazyOcrEngine::new(config.ocr.clone()),
                config.pdf.render_dpi,
            ));
        }

        let output = CsvOutput::new()
            .with_delimiter(config.output.delimiter)
            .map_err(|e| StatementError::Config(e.to_string()))?;

        Ok(Self::new(acquirer, output))
    }

    /// Convert the PDF at `input` into a CSV file at `output`.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        info!("Processing Bankinter VISA statement {}", input.display());
        let pdf = PdfExtractor::open(input)?;
        self.convert_document(&pdf, output)
    }

    /// Convert an already opened document.
    ///
    /// Nothing is written unless at least one transaction was found.
    pub fn convert_document(&self, pdf: &dyn PdfProcessor, output: &Path) -> Result<ConversionReport> {
        let acquired = self.acquirer.acquire(pdf)?;
        if acquired.is_blank() {
            warn!("Failed to extract text from the PDF");
            return Err(ExtractionError::NoText {
                strategy: acquired.source,
            }
            .into());
        }

        let transactions = self.extractor.extract_all(&acquired.text);
        if transactions.is_empty() {
            warn!("No transactions found in the extracted text");
            return Err(ExtractionError::NoTransactions {
                chars: acquired.text.chars().count(),
            }
            .into());
        }

        self.output.write_file(output, &transactions)?;
        info!(
            "Extracted {} transactions and saved them to {}",
            transactions.len(),
            output.display()
        );

        Ok(ConversionReport {
            source: acquired.source,
            pages: acquired.pages,
            summary: StatementSummary::from_transactions(&transactions),
            transactions,
            output: output.to_path_buf(),
        })
    }
}

/// Convert with the default configuration.
pub fn convert_pdf_to_csv(input: &Path, output: &Path) -> Result<ConversionReport> {
    Converter::from_config(&StatementConfig::default())?.convert(input, output)
}
