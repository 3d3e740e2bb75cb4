use sea_orm::{ConnectionTrait, DbErr, Schema};
use tracing::info;

use crate::entity::property_input;

/// Create the staging table if it does not exist yet.
///
/// Production databases get the table from the ingestion job; this exists for
/// local development (`database.ensure_table = true`) and tests.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(property_input::Entity);
    stmt.if_not_exists();

    db.execute_raw(backend.build(&stmt)).await?;
    info!("Ensured table stg_property_inputs exists");

    Ok(())
}
