use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

pub const COMPANY_HEADER: &str = "x-company-id";

/// The company whose portfolios the request operates on.
///
/// Taken from the `X-Company-Id` header when an upstream proxy sets it,
/// otherwise the configured default company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyId(pub i32);

impl FromRequestParts<AppState> for CompanyId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(COMPANY_HEADER) else {
            return Ok(CompanyId(state.config.company.default_id));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .map(CompanyId)
            .ok_or_else(|| AppError::Validation("Invalid X-Company-Id header".into()))
    }
}
