//! Data models for statement conversion.

pub mod config;
pub mod transaction;
