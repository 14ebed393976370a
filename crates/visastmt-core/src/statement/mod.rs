//! Transaction extraction from statement text.

mod parser;
pub mod patterns;
mod summary;

pub use parser::{extract_transactions, normalize_amount, TransactionExtractor};
pub use summary::StatementSummary;
