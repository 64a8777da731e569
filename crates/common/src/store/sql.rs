//! SeaORM lookup store
//!
//! Reads the generated `wiki` table (SQLite or PostgreSQL). Lookups are
//! synchronous: the store owns a current-thread runtime and blocks on each
//! query, so it must not be called from inside another async runtime.

use super::models::{WikiEntity, WikiRow};
use super::{Candidate, LookupStore};
use crate::config::StoreConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// Lookup store backed by a SQL database
pub struct SqlLookupStore {
    runtime: Runtime,
    conn: DatabaseConnection,
}

impl SqlLookupStore {
    /// Connect to the database at `url`
    pub fn connect(url: &str, config: &StoreConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to start store runtime: {}", e),
            })?;

        info!("Connecting to lookup database...");

        let mut opts = ConnectOptions::new(url.to_owned());
        opts.max_connections(config.max_connections.max(1))
            .min_connections(1)
            .connect_timeout(config.connect_timeout())
            .sqlx_logging(false);

        let conn = runtime
            .block_on(Database::connect(opts))
            .map_err(|e| AppError::StoreConnection {
                message: format!("Failed to connect to lookup database: {}", e),
            })?;

        info!("Lookup database connection established");

        Ok(Self { runtime, conn })
    }

    /// Ping the database to check connectivity
    pub fn ping(&self) -> Result<()> {
        self.runtime
            .block_on(self.conn.execute_unprepared("SELECT 1"))
            .map_err(|e| AppError::StoreConnection {
                message: format!("Lookup database ping failed: {}", e),
            })?;
        Ok(())
    }

    /// Run raw SQL against the store (schema setup, fixtures)
    pub fn execute_script(&self, sql: &str) -> Result<()> {
        self.runtime.block_on(self.conn.execute_unprepared(sql))?;
        Ok(())
    }

    fn row(&self, key: &str) -> Result<Option<WikiRow>> {
        let row = self
            .runtime
            .block_on(WikiEntity::find_by_id(key.to_owned()).one(&self.conn))?;

        debug!(key, found = row.is_some(), "Wiki row lookup");
        Ok(row)
    }
}

impl LookupStore for SqlLookupStore {
    fn frequency_of(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.row(key)?.and_then(|row| row.frequency()))
    }

    fn lowercase_canonical_of(&self, key: &str) -> Result<Option<String>> {
        Ok(self.row(key)?.and_then(|row| row.lower))
    }

    fn candidates_for(&self, key: &str) -> Result<Vec<Candidate>> {
        match self.row(key)? {
            Some(row) => row.parse_candidates().map_err(|e| AppError::CorruptRecord {
                key: key.to_string(),
                message: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
