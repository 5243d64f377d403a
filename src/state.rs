use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::{AppConfig, SeedConfig};
use crate::session::Sessions;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: Sessions,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to database")?;

        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            config,
            sessions: Sessions::new(),
        }
    }

    /// State backed by a private in-memory database, migrated and seeded.
    /// Used by tests; also handy for local experiments without a db file.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            seed: SeedConfig {
                admin_username: "admin".into(),
                admin_password: "Password".into(),
            },
        });

        // A single connection keeps every statement on the same in-memory db.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let state = Self::from_parts(db, config);
        crate::db::prepare(&state.db, &state.config).await?;
        Ok(state)
    }
}
