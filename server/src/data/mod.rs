//! Data storage layer
//!
//! - `sqlite` - Pooled SQLite store holding the dataset table
//! - `filters` - Filter descriptors and the predicate compiler
//! - `types` - Schema-less row representation
//! - `error` - Store error type

pub mod error;
pub mod filters;
pub mod sqlite;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use types::{Row, Scalar};
