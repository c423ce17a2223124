//! Response helpers shared by the router and endpoints.
//!
//! Error responses carry a small JSON body, `{"error": "<reason>"}`, and never
//! include internal details such as panic payloads or parser positions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Build a JSON error response with the given status.
pub fn error_response(status: StatusCode, reason: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: reason.to_string(),
        }),
    )
        .into_response()
}

pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

pub fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

pub fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
