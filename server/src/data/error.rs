//! Data layer error type

use thiserror::Error;

/// Errors raised by store operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Lookup or delete matched no row
    #[error("Row not found")]
    NotFound,

    /// SQLite / pool error (includes acquire timeouts)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error during import
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input data cannot be stored as given
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }
}
