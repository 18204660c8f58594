use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

/// Opens the process-wide pool. Fails if the database is unreachable.
pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect_with(cfg.connect_options())
        .await
        .with_context(|| format!("connect to database {} at {}:{}", cfg.name, cfg.host, cfg.port))?;
    tracing::info!(host = %cfg.host, port = cfg.port, db = %cfg.name, "database pool ready");
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}
