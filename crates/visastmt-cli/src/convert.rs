//! Convert command - statement PDF to CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use visastmt_core::models::config::StatementConfig;
use visastmt_core::{ConversionReport, Converter, ErrorKind, StatementError};

use crate::Cli;

/// Process exit codes, one per failure class.
pub mod codes {
    pub const CONFIG: u8 = 1;
    pub const UNREADABLE_INPUT: u8 = 3;
    pub const RENDERING_UNAVAILABLE: u8 = 4;
    pub const NO_TEXT: u8 = 5;
    pub const NO_TRANSACTIONS: u8 = 6;
    pub const WRITE_FAILURE: u8 = 7;
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(model_dir) = &cli.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    let converter = Converter::from_config(&config)?;

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };
    pb.set_message("Processing Bankinter VISA statement...");

    let result = converter.convert(&cli.pdf_path, &cli.csv_path);
    pb.finish_and_clear();
    let report = result?;

    if !cli.quiet {
        print_report(&report);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Explicit `--config` path, else the per-user config file if present, else defaults.
fn load_config(path: Option<&Path>) -> Result<StatementConfig, StatementError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = default_config_path();
            if !default.exists() {
                return Ok(StatementConfig::default());
            }
            default
        }
    };

    debug!("Loading configuration from {}", path.display());
    StatementConfig::from_file(&path)
        .map_err(|e| StatementError::Config(format!("{}: {}", path.display(), e)))
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("visastmt")
        .join("config.json")
}

fn print_report(report: &ConversionReport) {
    let summary = &report.summary;

    println!(
        "{} {} transactions saved to {} ({}, {} pages)",
        style("✓").green(),
        summary.transactions,
        report.output.display(),
        report.source,
        report.pages
    );

    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!(
            "{} Period: {} - {}",
            style("ℹ").blue(),
            first.format("%d/%m/%Y"),
            last.format("%d/%m/%Y")
        );
    }
    println!(
        "{} Debits: {} €  Credits: {} €",
        style("ℹ").blue(),
        summary.total_debits,
        summary.total_credits
    );
    println!("{} Cards: {}", style("ℹ").blue(), summary.cards.join(", "));

    if summary.with_both_amounts > 0 {
        println!(
            "{} {} transactions have both a debit and a credit",
            style("!").yellow(),
            summary.with_both_amounts
        );
    }
}

/// Print a failure and map it to its exit code.
pub fn report_failure(err: &anyhow::Error) -> ExitCode {
    let kind = err.downcast_ref::<StatementError>().map(StatementError::kind);

    match kind {
        Some(ErrorKind::NoText) | Some(ErrorKind::NoTransactions) => {
            eprintln!("{} {:#}", style("!").yellow(), err)
        }
        _ => eprintln!("{} {:#}", style("✗").red(), err),
    }

    ExitCode::from(exit_code(kind))
}

fn exit_code(kind: Option<ErrorKind>) -> u8 {
    match kind {
        Some(ErrorKind::UnreadableInput) => codes::UNREADABLE_INPUT,
        Some(ErrorKind::RenderingUnavailable) => codes::RENDERING_UNAVAILABLE,
        Some(ErrorKind::NoText) => codes::NO_TEXT,
        Some(ErrorKind::NoTransactions) => codes::NO_TRANSACTIONS,
        Some(ErrorKind::WriteFailure) => codes::WRITE_FAILURE,
        Some(ErrorKind::Config) | None => codes::CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::UnreadableInput,
            ErrorKind::RenderingUnavailable,
            ErrorKind::NoText,
            ErrorKind::NoTransactions,
            ErrorKind::WriteFailure,
            ErrorKind::Config,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| exit_code(Some(*k))).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains(&0));
        assert!(!codes.contains(&2));
    }

    #[test]
    fn test_unknown_errors_are_config_failures() {
        assert_eq!(exit_code(None), codes::CONFIG);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/visastmt.json"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
