use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drinks_api::config::{AppConfig, DatabaseConfig};
use drinks_api::database::{DatabaseManager, DrinkRepository};
use drinks_api::state::AppState;

#[derive(Parser)]
#[command(name = "drinks-api")]
#[command(about = "Drinks menu API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Drop all drinks and recreate the table with a seed drink")]
    ResetDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH0_DOMAIN, API_AUDIENCE, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let config = AppConfig::from_env().context("invalid configuration")?;
            init_tracing(config.api.enable_request_logging);
            serve(config, port).await
        }
        Commands::ResetDb => {
            init_tracing(false);
            // database settings only; no identity provider needed
            let database = DatabaseConfig::from_env().context("invalid database configuration")?;
            reset_db(&database).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "drinks_api=debug,tower_http=debug"
    } else {
        "drinks_api=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting drinks API in {:?} mode", config.environment);

    let port = port.unwrap_or(config.api.port);
    let state = AppState::from_config(config)
        .await
        .context("failed to initialise application state")?;
    let app = drinks_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Drinks API listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn reset_db(database: &DatabaseConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(database).await?;
    let seed = DrinkRepository::new(pool).drop_and_create_all().await?;
    println!("Database reset; seeded drink {} ({})", seed.id, seed.title);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
