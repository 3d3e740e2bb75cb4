use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::views;

/// Failures that end a request on the generic error page.
///
/// Handler-level problems (bad input, missing rows, database outages) are
/// turned into flash messages and redirects instead; this type covers what
/// is left.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Html(views::error::page(&message, &[]))).into_response()
    }
}
