//! Repository modules for SQLite operations

pub mod rows;
pub mod table;
