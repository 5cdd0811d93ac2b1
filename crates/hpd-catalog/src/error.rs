//! Error types for catalog import

use thiserror::Error;

/// Errors that can occur while importing a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to open the catalog file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV or missing column
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Decimal id column is not a number
    #[error("row {row}: invalid talkgroup id {value:?}")]
    InvalidId { row: usize, value: String },
}
