use std::collections::HashMap;
use std::sync::Arc;

use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{error, info, instrument, warn};

use super::user_message;
use crate::extractors::company::CompanyId;
use crate::flash::{self, Category};
use crate::models::property::{PropertyKey, PropertyUpdate};
use crate::service::{self, ServiceError, UpdateOutcome};
use crate::state::AppState;
use crate::views::{self, edit_href, portfolio_href};

/// `GET /edit/{portfolio_id}/{property_id}`: the edit form, prefilled.
#[instrument(skip(state, jar), fields(company_id = company.0))]
pub async fn property_edit(
    State(state): State<AppState>,
    Path((portfolio_id, property_id)): Path<(String, String)>,
    company: CompanyId,
    jar: SignedCookieJar,
) -> Response {
    let key = PropertyKey::new(company.0, portfolio_id, property_id);

    let result = async {
        let db = state.connect().await?;
        service::get_property(&db, &key).await
    }
    .await;

    match result {
        Ok(property) => {
            let (jar, flashes) = flash::take(jar);
            let dashboard_url = state.config.hooks.dashboard.dashboard_url.as_deref();
            (jar, Html(views::edit::page(&property, dashboard_url, &flashes))).into_response()
        }
        Err(e) => {
            if matches!(e, ServiceError::NotFound(_)) {
                warn!("Property not found");
            } else {
                error!(error = %e, "Error loading property data");
            }
            let jar = flash::push(jar, Category::Error, user_message(&e, "Error loading property data"));
            (jar, Redirect::to(&portfolio_href(&key.portfolio_id))).into_response()
        }
    }
}

/// `POST /update/{portfolio_id}/{property_id}`: validate and write the
/// non-blank fields, then return to the edit form.
#[instrument(skip(state, jar, form), fields(company_id = company.0))]
pub async fn property_update(
    State(state): State<AppState>,
    Path((portfolio_id, property_id)): Path<(String, String)>,
    company: CompanyId,
    jar: SignedCookieJar,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let back = Redirect::to(&edit_href(&portfolio_id, &property_id));

    let form = match form {
        Ok(Form(pairs)) => first_values(pairs),
        Err(e) => {
            warn!(error = %e, "Unreadable property update form");
            let jar = flash::push(jar, Category::Error, "Invalid form submission");
            return (jar, back).into_response();
        }
    };

    let update = match PropertyUpdate::from_form(&form) {
        Ok(update) => update,
        Err(e) => {
            warn!(field = %e.field, "Rejected property update");
            let jar = flash::push(jar, Category::Error, e.to_string());
            return (jar, back).into_response();
        }
    };

    let key = PropertyKey::new(company.0, portfolio_id, property_id);
    let result = async {
        let db = state.connect().await?;
        service::update_property(&db, &key, &update).await
    }
    .await;

    let jar = match result {
        Ok(UpdateOutcome::Applied { columns }) => {
            info!(columns, "Property update applied");
            if let Some(hooks) = &state.hooks {
                let transform = &state.config.hooks.transform;
                // The redirect does not wait on dbt or Metabase.
                common::hooks::spawn_after_update(
                    Arc::clone(hooks),
                    transform.models.clone(),
                    transform.timeout(),
                );
            }
            flash::push(jar, Category::Success, "Property updated successfully!")
        }
        Ok(UpdateOutcome::NoChanges) => flash::push(jar, Category::Info, "No changes to save"),
        Err(e) => {
            error!(error = %e, "Error updating property");
            flash::push(jar, Category::Error, user_message(&e, "Error updating property"))
        }
    };

    (jar, back).into_response()
}

/// Collapse repeated form keys, keeping the first submitted value.
fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut form = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        form.entry(key).or_insert(value);
    }
    form
}
