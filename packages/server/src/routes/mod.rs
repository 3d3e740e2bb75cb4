use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{edit, selection};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(selection::index))
        .route("/portfolio/{portfolio_id}", get(selection::property_select))
        .route("/edit/{portfolio_id}/{property_id}", get(edit::property_edit))
        .route("/update/{portfolio_id}/{property_id}", post(edit::property_update))
}
