//! Data API endpoints
//!
//! Filtered listing, lookup by id and delete by id over the dataset table.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use types::{DeleteResponse, ListDataQuery};

use crate::api::extractors::{RowPath, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::types::Row;
use crate::domain::RowGateway;

/// Shared state for Data API endpoints
#[derive(Clone)]
pub struct DataApiState {
    pub rows: Arc<RowGateway>,
}

/// Build Data API routes
pub fn routes(rows: Arc<RowGateway>) -> Router<()> {
    let state = DataApiState { rows };

    Router::new()
        .route("/", get(list_data))
        .route("/{id}", get(get_data).delete(delete_data))
        .with_state(state)
}

/// List rows matching filters and a search term
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "data",
    params(
        ("filters" = Option<String>, Query, description = "JSON array of {field, type, value} filters"),
        ("q" = Option<String>, Query, description = "Search term matched against Brand and Model")
    ),
    responses(
        (status = 200, description = "Matching rows in store order"),
        (status = 400, description = "Malformed or invalid filters", body = crate::api::types::ErrorBody),
        (status = 500, description = "Database query failed", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_data(
    State(state): State<DataApiState>,
    ValidatedQuery(query): ValidatedQuery<ListDataQuery>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .rows
        .list(query.filters.as_deref(), query.q.as_deref())
        .await
        .map_err(|e| ApiError::from_gateway(e, "Database query failed"))?;

    Ok(Json(rows))
}

/// Get a row by id
#[utoipa::path(
    get,
    path = "/api/data/{id}",
    tag = "data",
    params(
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "The row"),
        (status = 404, description = "Record not found", body = crate::api::types::ErrorBody),
        (status = 500, description = "Failed to fetch data by ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_data(
    State(state): State<DataApiState>,
    path: RowPath,
) -> Result<Json<Row>, ApiError> {
    let row = state
        .rows
        .get(&path.id)
        .await
        .map_err(|e| ApiError::from_gateway(e, "Failed to fetch data by ID"))?;

    Ok(Json(row))
}

/// Delete a row by id
#[utoipa::path(
    delete,
    path = "/api/data/{id}",
    tag = "data",
    params(
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "Row deleted", body = DeleteResponse),
        (status = 404, description = "Record not found", body = crate::api::types::ErrorBody),
        (status = 500, description = "Failed to delete record", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_data(
    State(state): State<DataApiState>,
    path: RowPath,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .rows
        .delete(&path.id)
        .await
        .map_err(|e| ApiError::from_gateway(e, "Failed to delete record"))?;

    Ok(Json(DeleteResponse { success: true }))
}
