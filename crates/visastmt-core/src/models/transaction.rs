//! Transaction record extracted from a card statement.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date format printed on the statement.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One statement line.
///
/// All fields are kept as text exactly as they appeared in the statement,
/// except the amounts, which use `.` as the decimal separator. An absent
/// amount is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date, `DD/MM/YYYY`. Not validated.
    pub date: String,

    /// Last four digits of the card.
    pub card: String,

    /// Merchant or concept text.
    pub description: String,

    /// Charged amount, or empty.
    pub debit: String,

    /// Credited amount, or empty.
    pub credit: String,
}

impl Transaction {
    /// Calendar date, if the date text is a real date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Debit as a decimal, if present.
    pub fn debit_amount(&self) -> Option<Decimal> {
        parse_amount(&self.debit)
    }

    /// Credit as a decimal, if present.
    pub fn credit_amount(&self) -> Option<Decimal> {
        parse_amount(&self.credit)
    }

    /// Whether both amount columns were populated.
    pub fn has_both_amounts(&self) -> bool {
        !self.debit.is_empty() && !self.credit.is_empty()
    }

    /// Fields in output column order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.date,
            &self.card,
            &self.description,
            &self.debit,
            &self.credit,
        ]
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Transaction {
        Transaction {
            date: "31/01/2024".to_string(),
            card: "1234".to_string(),
            description: "CAFÉ CENTRAL".to_string(),
            debit: "12.50".to_string(),
            credit: String::new(),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let tx = sample();
        assert_eq!(tx.parsed_date(), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(tx.debit_amount(), Some(Decimal::new(1250, 2)));
        assert_eq!(tx.credit_amount(), None);
        assert!(!tx.has_both_amounts());
    }

    #[test]
    fn test_impossible_date_has_no_calendar_value() {
        let tx = Transaction {
            date: "32/13/9999".to_string(),
            ..sample()
        };
        assert_eq!(tx.parsed_date(), None);
    }
}
