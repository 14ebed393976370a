//! Regex patterns for the Bankinter VISA statement layout.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One statement row: date, card, concept, debit, credit.
    ///
    /// The concept is non-greedy, so it stops before the first
    /// amount-shaped field. An amount slot holds `digits,dd` or nothing. A
    /// lone comma stands for an empty debit column only when a credit
    /// follows it; anywhere else it stays part of the concept.
    pub static ref TRANSACTION_LINE: Regex = Regex::new(concat!(
        r"(?P<date>\d{2}/\d{2}/\d{4})\s+",
        r"(?P<card>\d{4})\s+",
        r"(?P<description>.+?)\s+",
        r"(?:,\s+(?P<lone_credit>\d+,\d{2})",
        r"|(?P<debit>\d+,\d{2}|)\s+(?P<credit>\d+,\d{2}|))",
    )).unwrap();
}
