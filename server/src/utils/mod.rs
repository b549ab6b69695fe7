//! Shared helpers

pub mod file;
pub mod sql;
pub mod time;
