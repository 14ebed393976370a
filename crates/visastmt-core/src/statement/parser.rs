//! Structural transaction parser.

use tracing::{debug, warn};

use super::patterns::TRANSACTION_LINE;
use crate::models::transaction::Transaction;

/// Scans statement text for transaction rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionExtractor;

impl TransactionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every transaction, in source order.
    ///
    /// Matching is purely structural: impossible dates, unchecked card
    /// numbers and rows with both amounts are all returned as found. No
    /// match is an empty vector, not an error.
    pub fn extract_all(&self, text: &str) -> Vec<Transaction> {
        let transactions: Vec<Transaction> = TRANSACTION_LINE
            .captures_iter(text)
            .map(|caps| Transaction {
                date: caps["date"].to_string(),
                card: caps["card"].to_string(),
                description: caps["description"].trim().to_string(),
                debit: caps
                    .name("debit")
                    .map(|m| normalize_amount(m.as_str()))
                    .unwrap_or_default(),
                credit: caps
                    .name("credit")
                    .or_else(|| caps.name("lone_credit"))
                    .map(|m| normalize_amount(m.as_str()))
                    .unwrap_or_default(),
            })
            .collect();

        for tx in transactions.iter().filter(|tx| tx.has_both_amounts()) {
            warn!(
                "Transaction on {} ({}) has both a debit and a credit",
                tx.date, tx.description
            );
        }

        debug!("Matched {} transactions in {} chars", transactions.len(), text.len());
        transactions
    }
}

/// Extract every transaction from `text`, in source order.
pub fn extract_transactions(text: &str) -> Vec<Transaction> {
    TransactionExtractor::new().extract_all(text)
}

/// Convert a comma-decimal amount to dot-decimal by character substitution.
pub fn normalize_amount(amount: &str) -> String {
    amount.replace(',', ".")
}
