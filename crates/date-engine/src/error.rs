//! Error types for date-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
