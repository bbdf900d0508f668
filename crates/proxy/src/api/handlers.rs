//! HTTP request handlers

use crate::version;
use axum::http::StatusCode;

/// Health check
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Build version
pub async fn version_info() -> String {
    version::version_line()
}

/// Anything not routed
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
