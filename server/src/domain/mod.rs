//! Domain logic for the row service
//!
//! - `rows` - Row gateway: filter parsing, predicate compilation, execution
//! - `import` - CSV bulk import into the dataset table

pub mod import;
pub mod rows;

pub use import::{ImportSummary, import_csv};
pub use rows::{GatewayError, RowGateway};
