use anyhow::{Context, Result};
use itertools::Itertools;

use hubsync::model::validate_schemas;
use hubsync::seed::load_registry_seed;
use hubsync::store::PostgresStore;

/// One-shot registry bootstrap. Safe to re-run: mappings upsert on their
/// natural key and values skip if present, so a second run is a no-op.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    validate_schemas()?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = PostgresStore::new(&database_url).await?;

    println!("Connected to database. Applying schema...");
    store.migrate().await?;

    println!("Loading enum registry seed...");
    let report = load_registry_seed(&store).await?;

    println!(
        "Done: {} mappings loaded, {} failed",
        report.mappings_loaded, report.mappings_failed
    );
    println!(
        "Values: {} inserted, {} already present",
        report.values_inserted, report.values_skipped
    );

    if !report.is_clean() {
        let detail = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.enum_name, f.reason))
            .join("\n  ");
        println!("Failures:\n  {}", detail);
        std::process::exit(1);
    }

    Ok(())
}
