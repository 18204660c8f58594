use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            host: env_or("DB_HOST", "localhost"),
            port: parse_env("DB_PORT", 5432)?,
            name: env_or("DB_NAME", "kelas-go"),
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASS", "db"),
            max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout_secs: parse_env("DB_ACQUIRE_TIMEOUT_SECS", 30)?,
        };
        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port: parse_env("APP_PORT", 8000)?,
            db,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DbConfig {
    /// Connection options equivalent to the
    /// `host=.. port=.. user=.. password=.. dbname=.. sslmode=disable` DSN.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().with_context(|| format!("invalid {key}: {v:?}")),
        Err(_) => Ok(default),
    }
}
