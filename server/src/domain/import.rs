//! CSV bulk import
//!
//! Seeds the dataset table from a CSV file with a header row. Each header
//! becomes a column; rows are inserted one parameterized statement at a
//! time so a bad row is skipped without aborting the import.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::data::error::DataError;
use crate::data::sqlite::repositories::table;
use crate::utils::time::normalize_us_date;

/// Column holding US-style dates that are stored as ISO dates
const DATE_COLUMN: &str = "Date";

/// Column where `-` marks a missing value
const FAST_CHARGE_COLUMN: &str = "FastCharge_KmH";

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub failed: u64,
}

/// Import a CSV file into `table`, creating the table if needed
pub async fn import_csv(
    pool: &SqlitePool,
    table: &str,
    path: &Path,
) -> Result<ImportSummary, DataError> {
    let file = std::fs::File::open(path)?;
    tracing::info!(path = %path.display(), table, "Importing CSV");
    import_reader(pool, table, file).await
}

/// Import CSV data from any reader
pub async fn import_reader<R: Read>(
    pool: &SqlitePool,
    table: &str,
    reader: R,
) -> Result<ImportSummary, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // (csv index, column name); empty and repeated headers are dropped
    let mut columns: Vec<(usize, String)> = Vec::new();
    for (index, header) in csv_reader.headers()?.iter().enumerate() {
        let name = header.trim();
        if name.is_empty() || columns.iter().any(|(_, c)| c == name) {
            tracing::warn!(index, header, "Skipping CSV column");
            continue;
        }
        columns.push((index, name.to_string()));
    }

    if columns.is_empty() {
        return Err(DataError::InvalidData(
            "CSV header has no usable columns".to_string(),
        ));
    }

    let records: Vec<Result<csv::StringRecord, csv::Error>> = csv_reader.records().collect();

    let names: Vec<String> = columns.iter().map(|(_, name)| name.clone()).collect();
    table::ensure_table(pool, table, &names).await?;

    let mut summary = ImportSummary::default();
    for (line, record) in records.into_iter().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = line + 2, error = %e, "Skipping unreadable CSV row");
                summary.failed += 1;
                continue;
            }
        };

        let values: Vec<Option<String>> = columns
            .iter()
            .map(|(index, name)| normalize_cell(name, record.get(*index)))
            .collect();

        match table::insert_row(pool, table, &names, &values).await {
            Ok(()) => summary.inserted += 1,
            Err(e) => {
                tracing::warn!(line = line + 2, error = %e, "Failed to insert CSV row");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        failed = summary.failed,
        "CSV import finished"
    );
    Ok(summary)
}

/// Stored form of one CSV cell. Missing and blank cells become NULL; other
/// text is kept as written.
fn normalize_cell(column: &str, raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|v| !v.trim().is_empty())?;

    match column {
        DATE_COLUMN => normalize_us_date(raw.trim()),
        FAST_CHARGE_COLUMN if raw.trim() == "-" => None,
        _ => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::data::filters::Predicate;
    use crate::data::sqlite::repositories::rows;
    use crate::data::types::Scalar;

    const CSV: &str = "\
Brand,Model,AccelSec,Range_Km,FastCharge_KmH,Date
Tesla ,Model 3 Long Range Dual Motor,4.6,450,940,8/24/16
Renault,Kangoo Maxi ZE 33,22.4,160,-,3/7/21
Nissan,Leaf,7.9,220,230,2017-01-15
";

    async fn setup_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("Date", Some("8/24/16")), Some("2016-08-24".into()));
        assert_eq!(normalize_cell("Date", Some("not a date")), None);
        assert_eq!(normalize_cell("FastCharge_KmH", Some("-")), None);
        assert_eq!(normalize_cell("FastCharge_KmH", Some("")), None);
        assert_eq!(normalize_cell("Brand", Some(" Tesla ")), Some(" Tesla ".into()));
        assert_eq!(normalize_cell("Brand", Some("   ")), None);
        assert_eq!(normalize_cell("Brand", None), None);
        assert_eq!(normalize_cell("Model", Some("-")), Some("-".into()));
    }

    #[tokio::test]
    async fn test_import_reader() {
        let pool = setup_pool().await;
        let summary = import_reader(&pool, "electric_cars", CSV.as_bytes())
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 3,
                failed: 0
            }
        );

        let all = rows::list_rows(&pool, "electric_cars", &Predicate::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let tesla = &all[0];
        assert_eq!(tesla.get("id"), Some(&Scalar::Integer(1)));
        assert_eq!(tesla.get("Brand").and_then(Scalar::as_text), Some("Tesla "));
        assert_eq!(tesla.get("Date").and_then(Scalar::as_text), Some("2016-08-24"));
        assert_eq!(tesla.get("Range_Km"), Some(&Scalar::Integer(450)));

        assert_eq!(all[1].get("FastCharge_KmH"), Some(&Scalar::Null));
        assert_eq!(
            all[1].get("Date").and_then(Scalar::as_text),
            Some("2021-03-07")
        );
    }

    #[tokio::test]
    async fn test_imported_iso_date_round_trips() {
        let pool = setup_pool().await;
        import_reader(&pool, "electric_cars", CSV.as_bytes())
            .await
            .unwrap();
        let row = rows::get_row(&pool, "electric_cars", "3").await.unwrap();
        assert_eq!(row.get("Date").and_then(Scalar::as_text), Some("2017-01-15"));
    }

    #[tokio::test]
    async fn test_import_skips_empty_headers() {
        let pool = setup_pool().await;
        let data = "Brand,,Model\nTesla,ignored,Model S\n";
        import_reader(&pool, "cars", data.as_bytes()).await.unwrap();
        assert_eq!(
            table::table_columns(&pool, "cars").await.unwrap(),
            vec!["id", "Brand", "Model"]
        );
    }

    #[tokio::test]
    async fn test_import_short_row_fills_null() {
        let pool = setup_pool().await;
        let data = "Brand,Model\nTesla\n";
        let summary = import_reader(&pool, "cars", data.as_bytes()).await.unwrap();
        assert_eq!(summary.inserted, 1);
        let row = rows::get_row(&pool, "cars", "1").await.unwrap();
        assert_eq!(row.get("Model"), Some(&Scalar::Null));
    }

    #[tokio::test]
    async fn test_import_without_columns() {
        let pool = setup_pool().await;
        let result = import_reader(&pool, "cars", ",,\n1,2,3\n".as_bytes()).await;
        assert!(matches!(result, Err(DataError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_import_csv_file() {
        let pool = setup_pool().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let summary = import_csv(&pool, "electric_cars", file.path())
            .await
            .unwrap();
        assert_eq!(summary.inserted, 3);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let pool = setup_pool().await;
        let result = import_csv(&pool, "electric_cars", Path::new("/nonexistent/cars.csv")).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }
}
