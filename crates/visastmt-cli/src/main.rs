//! CLI application converting Bankinter VISA statement PDFs to CSV.

mod convert;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Extract transaction data from a Bankinter VISA statement PDF and save it as a CSV file
#[derive(Parser)]
#[command(name = "visastmt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the Bankinter VISA statement PDF file
    pub pdf_path: PathBuf,

    /// The path to save the resulting CSV file (overwritten if it exists)
    pub csv_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// OCR model directory (overrides the config file)
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    match convert::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => convert::report_failure(&e),
    }
}
