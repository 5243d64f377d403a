use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::config::AppConfig;

/// Creates the schema and seeds the admin account. Safe to call repeatedly:
/// migrations are tracked by sqlx and the seed is keyed on user id 1.
pub async fn prepare(db: &SqlitePool, config: &AppConfig) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    seed_admin(db, config).await?;
    Ok(())
}

async fn seed_admin(db: &SqlitePool, config: &AppConfig) -> anyhow::Result<()> {
    let hash = hash_password(&config.seed.admin_password)?;
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (id, username, password_hash, role)
        VALUES (1, ?, ?, 'admin')
        "#,
    )
    .bind(&config.seed.admin_username)
    .bind(&hash)
    .execute(db)
    .await
    .context("seed admin user")?;

    if result.rows_affected() > 0 {
        info!(username = %config.seed.admin_username, "admin user seeded");
    }
    Ok(())
}
