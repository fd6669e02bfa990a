//! NocBook Import - people bulk-import service
//!
//! Accepts CSV / XLS / XLSX uploads over HTTP and turns each row into a
//! person record owned by the authenticated user.

mod auth;
mod cli;
mod config;
mod db;
mod error;
mod handlers;
mod services;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::handlers::AppState;
use crate::services::store::{MemoryPersonStore, PersonStore, PgPersonStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "nocbook-import.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,nocbook_import=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(&config).await,
        Command::IssueToken { user_id, email } => {
            let token = auth::generate_token(user_id, &email, &config.jwt_secret)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting NocBook Import...");

    let store: Arc<dyn PersonStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections).await?;
            info!("Connected to PostgreSQL");
            db::run_migrations(&pool).await?;
            Arc::new(PgPersonStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, people are kept in memory and lost on restart");
            Arc::new(MemoryPersonStore::new())
        }
    };

    if let Err(e) = handlers::start_server(AppState::new(config, store)).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn migrate(config: &Config) -> Result<()> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;

    let pool = db::create_pool(url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    Ok(())
}
