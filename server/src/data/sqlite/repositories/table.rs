//! Dataset table shape: column discovery, creation and bulk inserts

use sqlx::SqlitePool;

use crate::core::constants::PRIMARY_KEY_COLUMN;
use crate::data::error::DataError;
use crate::utils::sql::quote_identifier;

/// Column names of `table` in declaration order
///
/// Returns an empty list when the table does not exist.
pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<String>, DataError> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?) ORDER BY cid")
            .bind(table)
            .fetch_all(pool)
            .await?;
    Ok(names)
}

/// Create the dataset table if missing and add any absent columns
///
/// The table always carries an auto-increment integer primary key. Data
/// columns use NUMERIC affinity so numeric text compares as numbers while
/// non-numeric text (dates, names) is stored unchanged.
pub async fn ensure_table(
    pool: &SqlitePool,
    table: &str,
    columns: &[String],
) -> Result<(), DataError> {
    let data_columns: Vec<&String> = columns
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(PRIMARY_KEY_COLUMN))
        .collect();

    let mut definitions = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_identifier(PRIMARY_KEY_COLUMN)
    )];
    definitions.extend(
        data_columns
            .iter()
            .map(|c| format!("{} NUMERIC", quote_identifier(c))),
    );

    let create = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table),
        definitions.join(", ")
    );
    sqlx::query(&create).execute(pool).await?;

    let existing = table_columns(pool, table).await?;
    for column in data_columns {
        if existing.iter().any(|e| e == column) {
            continue;
        }
        let alter = format!(
            "ALTER TABLE {} ADD COLUMN {} NUMERIC",
            quote_identifier(table),
            quote_identifier(column)
        );
        sqlx::query(&alter).execute(pool).await?;
        tracing::debug!(table, column = %column, "Added column");
    }

    Ok(())
}

/// Insert one row. `None` values are stored as NULL.
pub async fn insert_row(
    pool: &SqlitePool,
    table: &str,
    columns: &[String],
    values: &[Option<String>],
) -> Result<(), DataError> {
    if columns.len() != values.len() {
        return Err(DataError::InvalidData(format!(
            "expected {} values, got {}",
            columns.len(),
            values.len()
        )));
    }

    let column_list: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        column_list.join(", "),
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for value in values {
        query = query.bind(value.as_deref());
    }
    query.execute(pool).await?;

    Ok(())
}
