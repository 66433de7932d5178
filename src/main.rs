use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contact_api::auth::JwtKeys;
use contact_api::config::{self, AppConfig};
use contact_api::database::{ContactStore, DatabaseManager, MemoryStore, PgContactStore};
use contact_api::{app, is_production, AppState};

#[derive(Parser)]
#[command(name = "contact-api", version, about = "Authenticated contact and address book API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides CONTACT_API_PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Apply pending migrations before serving")]
        migrate: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contact_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting Contact API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Command::Serve { port: None, migrate: false }) {
        Command::Serve { port, migrate } => serve(config, port, migrate).await,
        Command::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, port: Option<u16>, migrate: bool) -> anyhow::Result<()> {
    let store: Arc<dyn ContactStore> = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if migrate {
                DatabaseManager::migrate(&pool).await?;
            }
            Arc::new(PgContactStore::new(pool))
        }
        None if is_production!() => bail!("DATABASE_URL must be set in production"),
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    let jwt = JwtKeys::from_secret(&config.security.jwt_secret, config.security.jwt_leeway_secs)
        .context("JWT_SECRET must be set")?;

    let router = app(AppState::new(store, jwt), config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.api.port)));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Contact API listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
