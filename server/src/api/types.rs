//! Shared API types
//!
//! Error envelope shared by every endpoint: `{"error": <message>, "code": <CODE>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::filters::FilterError;
use crate::domain::GatewayError;

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Map a gateway error, using `store_message` for store failures
    ///
    /// Store failures are logged with their cause; the client only ever sees
    /// `store_message`.
    pub fn from_gateway(e: GatewayError, store_message: &str) -> Self {
        match e {
            GatewayError::Filter(FilterError::Malformed(detail)) => {
                tracing::debug!(detail = %detail, "Malformed filters");
                Self::bad_request("INVALID_FILTERS_JSON", "Invalid filters JSON")
            }
            GatewayError::Filter(e @ FilterError::Invalid { .. }) => {
                Self::bad_request("INVALID_FILTER", e.to_string())
            }
            GatewayError::NotFound => Self::not_found("NOT_FOUND", "Record not found"),
            GatewayError::Store(e) => {
                tracing::error!(error = %e, transient = e.is_transient(), "Store failure");
                Self::internal(store_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}
