use crate::config::{connect_database, migrate_database, BootstrapSettings};

/// Run database migrations
///
/// Connects to the configured database and runs all pending migrations.
/// It does not initialize the full AppData structure.
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(...)` - Connection or migration failed
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✅ Migrations applied to {}", settings.database_url());

    Ok(())
}
