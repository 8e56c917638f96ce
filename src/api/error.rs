//! JSON rendering of errors.

use crate::error::{AuditoriumError, ErrorKind};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuditoriumError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(kind = kind.as_str(), "Request failed: {}", self);
        } else {
            warn!(kind = kind.as_str(), "Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: kind.as_str(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AuditoriumError {
    fn from(rejection: JsonRejection) -> Self {
        AuditoriumError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AuditoriumError {
    fn from(rejection: PathRejection) -> Self {
        AuditoriumError::Validation(rejection.body_text())
    }
}
