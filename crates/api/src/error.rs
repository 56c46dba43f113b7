use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use phm_core::error::CoreError;
use serde_json::json;

use crate::source::SourceError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`SourceError`] for failed
/// snapshot retrieval. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `phm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The snapshot source could not supply a fleet.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::DataContract { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DATA_CONTRACT",
                    core.to_string(),
                ),
            },

            // --- Snapshot retrieval ---
            AppError::Source(err) => (
                StatusCode::BAD_GATEWAY,
                "SOURCE_UNAVAILABLE",
                err.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
