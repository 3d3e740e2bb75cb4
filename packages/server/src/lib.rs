pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod utils;
pub mod views;

use axum::extract::DefaultBodyLimit;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let body_limit = state.config.server.max_body_bytes;

    routes::routes()
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
