use sea_orm::entity::prelude::*;

/// One row of the staging table: a single property inside a company's
/// portfolio. Rows are created by the ingestion job; this service only
/// updates attribute columns in place.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stg_property_inputs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub portfolio_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub property_id: String,

    // Header
    pub property_name: Option<String>,
    pub property_address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub building_class: Option<String>,

    // Property traits
    pub unit_count: Option<f64>,
    pub capex_per_unit: Option<f64>,

    pub staging_loaded_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
