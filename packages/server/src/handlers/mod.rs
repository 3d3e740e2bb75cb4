pub mod edit;
pub mod selection;

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::service::ServiceError;

/// Text shown to the operator for a failed request. Database internals stay in the logs.
fn user_message(err: &ServiceError, fallback: &str) -> String {
    match err {
        ServiceError::Connectivity(_) | ServiceError::NotFound(_) => err.to_string(),
        ServiceError::Database(_) => fallback.to_string(),
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".into())
}

/// Response for a handler that panicked.
pub fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal("handler panicked".into()).into_response()
}
