use hubsync::config::AppConfig;
use hubsync::model::validate_schemas;
use hubsync::seed;
use hubsync::store::PostgresStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("hubsync: enum-mapping and aggregate-write engine");

    // Bucket schema typos should kill the process before any request.
    validate_schemas()?;

    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: tx_timeout_ms={}",
        config.write.tx_timeout_ms
    );

    println!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let store = PostgresStore::new(&database_url)
        .await?
        .with_transaction_timeout(config.write.tx_timeout_ms);

    println!("Running database migrations...");
    store.migrate().await?;
    println!("Database ready");

    // Load the registry seed for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading registry seed...");
        let report = seed::load_registry_seed(&store).await?;
        println!(
            "Registry seeded: {} mappings, {} values inserted, {} skipped, {} failed",
            report.mappings_loaded,
            report.values_inserted,
            report.values_skipped,
            report.mappings_failed
        );
    }

    Ok(())
}
