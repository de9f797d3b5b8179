//! SQLite implementation of the membership store, on top of sqlx.

pub mod executor;
pub mod read_impl;
pub mod schema;
pub mod write_impl;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

use super::config::StoreConfig;
use super::search::MatchMode;
use super::Backend;
use crate::error::{EngineError, EngineResult};

/// SQLite-backed membership store.
///
/// Holds no session-scoped mutable state: one pool plus the resolved match
/// mode, so a single instance is safe to share across concurrent callers.
pub struct SqliteMembershipStore {
    pool: SqlitePool,
    match_mode: MatchMode,
}

impl SqliteMembershipStore {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

#[async_trait]
impl Backend for SqliteMembershipStore {
    async fn connect(config: &StoreConfig) -> EngineResult<Self> {
        config.validate().map_err(EngineError::Configuration)?;

        let url = if config.connection_url == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            config.connection_url.clone()
        };

        // Foreign keys are set per connection so every pooled connection
        // enforces the membership referential-integrity contract.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| EngineError::Configuration(format!("Invalid connection URL: {}", e)))?
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await
            .map_err(|e| EngineError::Database(format!("Failed to connect: {}", e)))?;

        Ok(Self {
            pool,
            match_mode: config.match_mode,
        })
    }

    async fn health_check(&self) -> EngineResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn init_schema(&self) -> EngineResult<()> {
        schema::init_schema(&self.pool).await
    }

    async fn cleanup(&self) -> EngineResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_health_check() {
        let store = SqliteMembershipStore::connect(&StoreConfig::memory_sqlite())
            .await
            .unwrap();

        store.health_check().await.unwrap();
        assert_eq!(store.match_mode(), MatchMode::Medial);

        store.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = StoreConfig::sqlite(String::new());
        let result = SqliteMembershipStore::connect(&config).await;
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
