//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{data, health};
use crate::api::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rowgate API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Filtered access to a tabular dataset"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "data", description = "Dataset rows")
    ),
    paths(
        health::health,
        data::list_data,
        data::get_data,
        data::delete_data,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        data::types::ListDataQuery,
        data::types::DeleteResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
