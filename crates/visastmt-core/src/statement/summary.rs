//! Totals and ranges over extracted transactions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;

/// Summary of a converted statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    /// Number of transactions.
    pub transactions: usize,
    /// Sum of all debits.
    pub total_debits: Decimal,
    /// Sum of all credits.
    pub total_credits: Decimal,
    /// Earliest real calendar date among the transactions.
    pub first_date: Option<NaiveDate>,
    /// Latest real calendar date among the transactions.
    pub last_date: Option<NaiveDate>,
    /// Distinct card tokens, sorted.
    pub cards: Vec<String>,
    /// Transactions that carry both a debit and a credit.
    pub with_both_amounts: usize,
}

impl StatementSummary {
    /// Summarize transactions. Dates that are not real dates are left out of
    /// the range but the transaction still counts.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let dates: Vec<NaiveDate> = transactions.iter().filter_map(Transaction::parsed_date).collect();
        let cards: BTreeSet<&str> = transactions.iter().map(|tx| tx.card.as_str()).collect();

        Self {
            transactions: transactions.len(),
            total_debits: transactions.iter().filter_map(Transaction::debit_amount).sum(),
            total_credits: transactions.iter().filter_map(Transaction::credit_amount).sum(),
            first_date: dates.iter().min().copied(),
            last_date: dates.iter().max().copied(),
            cards: cards.into_iter().map(str::to_string).collect(),
            with_both_amounts: transactions.iter().filter(|tx| tx.has_both_amounts()).count(),
        }
    }

    /// Credits minus debits.
    pub fn net(&self) -> Decimal {
        self.total_credits - self.total_debits
    }
}
