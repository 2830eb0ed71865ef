//! Food Randomizer server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────────────┐
//! │ app.env  │───▶│   CLI    │───▶│   YAML   │───▶│ Gateway (axum)   │
//! │ (dotenv) │    │  (clap)  │    │ (config) │    │ Postgres | memory│
//! └──────────┘    └──────────┘    └──────────┘    └──────────────────┘
//! ```

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use food_randomizer::config::{AppConfig, CliArgs};
use food_randomizer::db::Database;
use food_randomizer::gateway::{self, state::AppState};
use food_randomizer::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // app.env first, .env as a fallback; both optional
    if dotenvy::from_filename("app.env").is_err() {
        let _ = dotenvy::dotenv();
    }

    let cli = CliArgs::parse();
    let config = AppConfig::load(&cli).context("Failed to load configuration")?;
    let _log_guard = init_logging(&config);

    tracing::info!(
        "Starting food_randomizer {} in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.env
    );

    let state = match &config.database.url {
        Some(url) => {
            let db = Database::connect(url, &config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            if config.database.run_migrations {
                db.migrate().await.context("Failed to apply migrations")?;
            }
            AppState::with_postgres(Arc::new(db), &config.auth)?
        }
        None => {
            tracing::warn!("database.url not set: using in-memory stores, data is lost on restart");
            AppState::in_memory(&config.auth)?
        }
    };

    gateway::run_server(&config.gateway, Arc::new(state), config.auth.require_admin_token).await
}
