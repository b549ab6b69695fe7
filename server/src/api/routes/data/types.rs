//! Data API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Query parameters for listing rows
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ListDataQuery {
    /// JSON array of `{field, type, value}` filter descriptors
    pub filters: Option<String>,

    /// Free-text search over brand and model
    pub q: Option<String>,
}

/// Response for a successful delete
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
