//! Error types for the projection library
//!
//! Numeric degeneracies (zero denominators, unreachable goals, failed
//! lookups) are recovered in place and never show up here. These variants
//! cover the things a caller can actually get wrong: bad input files and
//! unknown names.

use thiserror::Error;

use crate::catalog::AssetClass;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unknown frequency: {0} (expected monthly, quarterly or annually)")]
    UnknownFrequency(String),

    #[error("Unknown modality: {0}")]
    UnknownModality(String),

    #[error("Unknown asset class: {0}")]
    UnknownAssetClass(String),

    #[error("Asset lookup failed for {ticker} ({class:?}): {reason}")]
    Lookup {
        ticker: String,
        class: AssetClass,
        reason: String,
    },

    #[error("Catalog entry {ticker}: {reason}")]
    InvalidCatalogEntry { ticker: String, reason: String },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Withdrawal date {date} is outside the horizon {start} to {end}")]
    InvalidWithdrawalDate {
        date: chrono::NaiveDate,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
