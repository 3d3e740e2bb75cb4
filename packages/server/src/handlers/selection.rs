use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{error, instrument, warn};

use super::user_message;
use crate::extractors::company::CompanyId;
use crate::flash::{self, Category};
use crate::service;
use crate::state::AppState;
use crate::views;

/// `GET /`: portfolio picker.
#[instrument(skip(state, jar), fields(company_id = company.0))]
pub async fn index(
    State(state): State<AppState>,
    company: CompanyId,
    jar: SignedCookieJar,
) -> Response {
    let (jar, flashes) = flash::take(jar);

    let result = async {
        let db = state.connect().await?;
        service::list_portfolios(&db, company.0).await
    }
    .await;

    match result {
        Ok(portfolios) => (
            jar,
            Html(views::selection::portfolio_page(company.0, &portfolios, &flashes)),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Error loading portfolios");
            let message = user_message(&e, "Error loading portfolios");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar,
                Html(views::error::page(&message, &flashes)),
            )
                .into_response()
        }
    }
}

/// `GET /portfolio/{portfolio_id}`: property picker for one portfolio.
#[instrument(skip(state, jar), fields(company_id = company.0))]
pub async fn property_select(
    State(state): State<AppState>,
    Path(portfolio_id): Path<String>,
    company: CompanyId,
    jar: SignedCookieJar,
) -> Response {
    let result = async {
        let db = state.connect().await?;
        service::list_properties(&db, company.0, &portfolio_id).await
    }
    .await;

    match result {
        Ok(properties) if properties.is_empty() => {
            warn!("Portfolio has no properties");
            let jar = flash::push(
                jar,
                Category::Warning,
                format!("No properties found in portfolio {portfolio_id}"),
            );
            (jar, Redirect::to("/")).into_response()
        }
        Ok(properties) => {
            let (jar, flashes) = flash::take(jar);
            (
                jar,
                Html(views::selection::property_page(&portfolio_id, &properties, &flashes)),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Error loading properties");
            let jar = flash::push(jar, Category::Error, user_message(&e, "Error loading properties"));
            (jar, Redirect::to("/")).into_response()
        }
    }
}
