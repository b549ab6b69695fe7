//! Rowgate server library
//!
//! Serves a schema-less tabular dataset over HTTP and compiles client filter
//! lists into parameterized SQLite predicates.

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
