use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use restaurant_access::api::build_app;
use restaurant_access::app_data::AppData;
use restaurant_access::cli::{self, Cli, Commands};
use restaurant_access::config::{
    connect_database, init_logging, migrate_database, BootstrapSettings, LoggingConfig,
    SecretManager, SystemEnvironment,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(&LoggingConfig::from_env_provider(&SystemEnvironment))?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Loaded {:?}", settings);

    if command == Commands::Migrate {
        return cli::migrate::run_migrations(&settings).await;
    }

    let secret_manager = Arc::new(SecretManager::init()?);
    tracing::debug!("Secret manager initialized: {}", secret_manager);

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::new(db, secret_manager, &settings));

    match command {
        Commands::Serve => serve(app_data, &settings).await?,
        other => cli::execute_command(other, &app_data).await?,
    }

    Ok(())
}

async fn serve(app_data: Arc<AppData>, settings: &BootstrapSettings) -> Result<(), std::io::Error> {
    let address = settings.server_address();
    let public_url = format!("http://localhost:{}", settings.server_port());

    let app = build_app(app_data, &public_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", public_url);

    Server::new(TcpListener::bind(address)).run(app).await
}
