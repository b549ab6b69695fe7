//! Dynamic row filters
//!
//! Client filter descriptors are parsed and validated here, then compiled
//! into a parameterized predicate. Descriptor values are only ever bound
//! as parameters; field names are quoted and checked against the live
//! column set by the caller.
//!
//! ## Usage
//!
//! ```
//! use rowgate_server::data::filters::{compile, parse_filters};
//!
//! let json = r#"[{"field": "Brand", "type": "equals", "value": "Tesla"}]"#;
//! let filters = parse_filters(json).unwrap();
//! let predicate = compile(&filters, Some("model"), &["Brand", "Model"]);
//! assert_eq!(predicate.params.values.len(), 3);
//! ```

mod compiler;
mod parser;
mod types;

pub use compiler::{Predicate, SqlParams, compile};
pub use parser::parse_filters;
pub use types::{FilterDescriptor, FilterError, FilterOperator};
