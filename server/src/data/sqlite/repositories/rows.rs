//! Row queries against the dataset table
//!
//! All statements are built from a quoted table name, an optional compiled
//! predicate, and positional parameters. Nothing user-supplied is spliced
//! into the SQL text.

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, SqlitePool, TypeInfo, ValueRef};

use crate::core::constants::PRIMARY_KEY_COLUMN;
use crate::data::error::DataError;
use crate::data::filters::Predicate;
use crate::data::types::{Row, Scalar};
use crate::utils::sql::quote_identifier;

/// Convert a store row into the schema-less row type
///
/// Cells are decoded by the storage class of the value, not the declared
/// column type, since NUMERIC columns can hold any class.
fn decode_row(row: &SqliteRow) -> Result<Row, DataError> {
    let mut out = Row::with_capacity(row.len());

    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            Scalar::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" => Scalar::Integer(row.try_get_unchecked(index)?),
                "REAL" => Scalar::Real(row.try_get_unchecked(index)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                    Scalar::Text(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => Scalar::Text(row.try_get_unchecked(index)?),
            }
        };
        out.push(column.name(), value);
    }

    Ok(out)
}

/// All rows matching `predicate`, in store order
pub async fn list_rows(
    pool: &SqlitePool,
    table: &str,
    predicate: &Predicate,
) -> Result<Vec<Row>, DataError> {
    let sql = format!(
        "SELECT * FROM {}{}",
        quote_identifier(table),
        predicate.where_clause()
    );

    let mut query = sqlx::query(&sql);
    for value in &predicate.params.values {
        query = query.bind(value.as_str());
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(decode_row).collect()
}

/// The row whose primary key equals `id`
pub async fn get_row(pool: &SqlitePool, table: &str, id: &str) -> Result<Row, DataError> {
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ? LIMIT 1",
        quote_identifier(table),
        quote_identifier(PRIMARY_KEY_COLUMN)
    );

    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DataError::NotFound)?;

    decode_row(&row)
}

/// Delete the row whose primary key equals `id`
///
/// Fails with [`DataError::NotFound`] when no row was removed, so a repeat
/// delete of the same id is reported as not found.
pub async fn delete_row(pool: &SqlitePool, table: &str, id: &str) -> Result<(), DataError> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quote_identifier(table),
        quote_identifier(PRIMARY_KEY_COLUMN)
    );

    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DataError::NotFound);
    }

    Ok(())
}
