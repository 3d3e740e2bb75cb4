use std::path::Path;

use anyhow::Context;
use tracing::info;

const SEED_NAME: &str = "rent_roll_assumptions";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let csv_path = format!("seeds/{SEED_NAME}.csv");
    let yaml_path = format!("models/{SEED_NAME}.yml");

    let columns = seed_schema::generate(Path::new(&csv_path), Path::new(&yaml_path), SEED_NAME)
        .with_context(|| format!("Failed to generate seed schema from {csv_path}"))?;

    info!("Wrote seed schema to {} ({} columns)", yaml_path, columns);
    Ok(())
}
