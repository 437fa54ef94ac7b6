//! Service settings read from the environment.
//!
//! `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS` configure the store; a
//! `.env` file is honoured when present. Rocket's own settings (address,
//! port, secret key) stay with Rocket and are read from `ROCKET_*`
//! variables or `Rocket.toml`.

use anyhow::{Context, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://noteapp.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Settings {
            database_url,
            max_connections,
        })
    }

    /// A private in-memory database. Every SQLite connection to `:memory:`
    /// opens a fresh database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}
