//! Row gateway
//!
//! One operation per HTTP action. Filters are parsed and validated before
//! any row query runs, and nothing is kept between calls.

use std::sync::Arc;

use thiserror::Error;

use crate::core::constants::SEARCHABLE_COLUMNS;
use crate::data::error::DataError;
use crate::data::filters::{FilterError, compile, parse_filters};
use crate::data::sqlite::SqliteService;
use crate::data::sqlite::repositories::{rows, table};
use crate::data::types::Row;

/// Row gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Filter payload malformed or a descriptor invalid
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Get or delete target absent
    #[error("Record not found")]
    NotFound,

    /// Store unreachable, query failed or timed out
    #[error("Store failure: {0}")]
    Store(DataError),
}

impl From<DataError> for GatewayError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

/// Gateway over the dataset table
pub struct RowGateway {
    database: Arc<SqliteService>,
    table: String,
}

impl RowGateway {
    pub fn new(database: Arc<SqliteService>, table: impl Into<String>) -> Self {
        Self {
            database,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// List rows matching `filters_json` and the search term `search`
    ///
    /// Filter fields must name live columns of the table. Search columns that
    /// the table lacks are left out of the search fragment.
    pub async fn list(
        &self,
        filters_json: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Row>, GatewayError> {
        let filters = parse_filters(filters_json.unwrap_or_default())?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let pool = self.database.pool();

        let searchable: Vec<&str> = if filters.is_empty() && search.is_none() {
            Vec::new()
        } else {
            let columns = table::table_columns(pool, &self.table).await?;
            if columns.is_empty() {
                return Err(GatewayError::Store(DataError::InvalidData(format!(
                    "table '{}' not found",
                    self.table
                ))));
            }
            for filter in &filters {
                filter.ensure_known_column(&columns)?;
            }
            SEARCHABLE_COLUMNS
                .iter()
                .copied()
                .filter(|c| columns.iter().any(|known| known == c))
                .collect()
        };

        let predicate = compile(&filters, search, &searchable);
        tracing::debug!(
            table = %self.table,
            expression = %predicate.expression,
            params = predicate.params.len(),
            "Compiled row predicate"
        );

        Ok(rows::list_rows(pool, &self.table, &predicate).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Row, GatewayError> {
        Ok(rows::get_row(self.database.pool(), &self.table, id).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        rows::delete_row(self.database.pool(), &self.table, id).await?;
        tracing::debug!(table = %self.table, id, "Row deleted");
        Ok(())
    }
}
