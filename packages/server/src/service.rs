//! Reads and writes against the staging table. Every function takes the
//! company explicitly and filters on it.

use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::property_input;
use crate::models::property::{PropertyKey, PropertySummary, PropertyUpdate};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database connection failed")]
    Connectivity(#[source] DbErr),

    #[error("Property {0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        if common::database::is_connectivity_error(&err) {
            ServiceError::Connectivity(err)
        } else {
            ServiceError::Database(err)
        }
    }
}

/// What a successful [`update_property`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { columns: usize },
    NoChanges,
}

/// Distinct portfolio ids for the company, ascending.
#[instrument(skip(db))]
pub async fn list_portfolios<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
) -> Result<Vec<String>, ServiceError> {
    let portfolios = property_input::Entity::find()
        .select_only()
        .column(property_input::Column::PortfolioId)
        .distinct()
        .filter(property_input::Column::CompanyId.eq(company_id))
        .filter(property_input::Column::PortfolioId.is_not_null())
        .order_by_asc(property_input::Column::PortfolioId)
        .into_tuple::<String>()
        .all(db)
        .await?;

    Ok(portfolios)
}

/// Properties in one portfolio, ordered by name.
#[instrument(skip(db))]
pub async fn list_properties<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
    portfolio_id: &str,
) -> Result<Vec<PropertySummary>, ServiceError> {
    let properties = property_input::Entity::find()
        .select_only()
        .column(property_input::Column::PropertyId)
        .column(property_input::Column::PropertyName)
        .column(property_input::Column::PropertyAddress)
        .column(property_input::Column::City)
        .column(property_input::Column::UnitCount)
        .column(property_input::Column::BuildingClass)
        .filter(property_input::Column::CompanyId.eq(company_id))
        .filter(property_input::Column::PortfolioId.eq(portfolio_id))
        .filter(property_input::Column::PropertyId.is_not_null())
        .order_by_asc(property_input::Column::PropertyName)
        .into_model::<PropertySummary>()
        .all(db)
        .await?;

    Ok(properties)
}

#[instrument(skip(db), fields(company_id = key.company_id, portfolio_id = %key.portfolio_id, property_id = %key.property_id))]
pub async fn get_property<C: ConnectionTrait>(
    db: &C,
    key: &PropertyKey,
) -> Result<property_input::Model, ServiceError> {
    property_input::Entity::find_by_id((
        key.company_id,
        key.portfolio_id.clone(),
        key.property_id.clone(),
    ))
    .one(db)
    .await?
    .ok_or_else(|| ServiceError::NotFound(key.property_id.clone()))
}

/// Write the validated columns and a fresh `staging_loaded_at` in a single
/// statement filtered on the full key.
#[instrument(skip(db, update), fields(company_id = key.company_id, portfolio_id = %key.portfolio_id, property_id = %key.property_id, columns = update.len()))]
pub async fn update_property<C: ConnectionTrait>(
    db: &C,
    key: &PropertyKey,
    update: &PropertyUpdate,
) -> Result<UpdateOutcome, ServiceError> {
    if update.is_empty() {
        return Ok(UpdateOutcome::NoChanges);
    }

    let mut stmt = property_input::Entity::update_many();
    for (field, value) in update.changes() {
        stmt = stmt.col_expr(field.column(), Expr::value(Value::from(value.clone())));
    }

    let result = stmt
        .col_expr(
            property_input::Column::StagingLoadedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(property_input::Column::CompanyId.eq(key.company_id))
        .filter(property_input::Column::PortfolioId.eq(key.portfolio_id.as_str()))
        .filter(property_input::Column::PropertyId.eq(key.property_id.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(key.property_id.clone()));
    }

    info!(
        rows = result.rows_affected,
        fields = ?update.fields().map(|f| f.name()).collect::<Vec<_>>(),
        "Property updated"
    );
    Ok(UpdateOutcome::Applied {
        columns: update.len(),
    })
}
