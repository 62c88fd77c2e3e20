//! # orr-db
//!
//! libSQL storage for Orrery.
//!
//! Holds every relational row the site serves: portfolio content, blog
//! posts, astronomy logs and research data, user-scoped research projects
//! and finance records, plus accounts and login sessions. Repository
//! methods live on [`service::OrrService`]; see [`repos`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Raw database handle: one libSQL database plus its connection.
pub struct OrrDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl OrrDb {
    /// Open a local database file (or `":memory:"`) and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let orr_db = Self { db, conn };
        orr_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(orr_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL, e.g. `"pst-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> OrrDb {
        OrrDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "users",
            "sessions",
            "skills",
            "project_categories",
            "research_categories",
            "portfolio_projects",
            "portfolio_project_skills",
            "project_documents",
            "blog_categories",
            "blog_posts",
            "blog_images",
            "contact_messages",
            "celestial_objects",
            "observation_logs",
            "eclipse_observations",
            "astro_photos",
            "astro_research_projects",
            "research_data_entries",
            "research_analyses",
            "research_templates",
            "research_projects",
            "finance_categories",
            "transactions",
            "budgets",
            "research_expenses",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("pst").await.unwrap();
        assert!(id.starts_with("pst-"), "ID should start with 'pst-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in orr_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at)
                 VALUES ('t', 'usr-missing', '2025-01-01T00:00:00+00:00', '2025-01-02T00:00:00+00:00')",
                (),
            )
            .await;
        assert!(result.is_err(), "dangling user_id should be rejected");
    }

    #[tokio::test]
    async fn budget_month_unique_per_category() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO users (id, username, password_hash, created_at)
                     VALUES ('usr-1', 'ada', 'x', '2025-01-01T00:00:00+00:00');
                 INSERT INTO finance_categories (id, user_id, name, kind, created_at)
                     VALUES ('fcat-1', 'usr-1', 'Food', 'expense', '2025-01-01T00:00:00+00:00');
                 INSERT INTO budgets (id, user_id, category_id, amount, month, created_at)
                     VALUES ('bud-1', 'usr-1', 'fcat-1', '100', '2025-03-01', '2025-01-01T00:00:00+00:00');",
            )
            .await
            .unwrap();

        let dup = db
            .conn()
            .execute(
                "INSERT INTO budgets (id, user_id, category_id, amount, month, created_at)
                 VALUES ('bud-2', 'usr-1', 'fcat-1', '50', '2025-03-01', '2025-01-01T00:00:00+00:00')",
                (),
            )
            .await;
        assert!(dup.is_err(), "second budget for the same month should fail");
    }
}
