//! Database migration runner.
//!
//! The schema is embedded at compile time and executed on every open. All
//! statements use `IF NOT EXISTS`, so re-running is a no-op.

use crate::OrrDb;
use crate::error::DatabaseError;

/// Initial schema: 25 tables and their lookup indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl OrrDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
