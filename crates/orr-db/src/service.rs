//! Service layer hosting every repository method.
//!
//! `OrrService` wraps `OrrDb`. All repo methods are implemented as
//! `impl OrrService` blocks under [`crate::repos`].

use orr_core::text::suffixed_slug;

use crate::OrrDb;
use crate::error::DatabaseError;

/// Slug used when a title slugifies to nothing.
const FALLBACK_SLUG: &str = "untitled";

/// Shared handle for all storage operations.
pub struct OrrService {
    db: OrrDb,
}

impl OrrService {
    /// Create a new service over a local database.
    ///
    /// `db_path` is a file path, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = OrrDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    #[must_use]
    pub const fn from_db(db: OrrDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &OrrDb {
        &self.db
    }

    /// First free slug in `table` starting from `base`, suffixing `-2`, `-3`, ...
    ///
    /// `table` is always a literal from this crate.
    pub(crate) async fn unique_slug(&self, table: &str, base: &str) -> Result<String, DatabaseError> {
        let base = if base.is_empty() { FALLBACK_SLUG } else { base };
        let mut attempt = 1;
        loop {
            let candidate = suffixed_slug(base, attempt);
            let mut rows = self
                .db
                .conn()
                .query(
                    &format!("SELECT 1 FROM {table} WHERE slug = ?1"),
                    [candidate.as_str()],
                )
                .await?;
            if rows.next().await?.is_none() {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    /// Run a `SELECT COUNT(*)` style query and return the single integer.
    pub(crate) async fn count(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn unique_slug_suffixes_on_collision() {
        let svc = test_service().await;
        svc.db()
            .conn()
            .execute_batch(
                "INSERT INTO blog_categories (id, name, slug) VALUES ('bcat-1', 'Space', 'space');
                 INSERT INTO blog_categories (id, name, slug) VALUES ('bcat-2', 'Space 2', 'space-2');",
            )
            .await
            .unwrap();

        assert_eq!(svc.unique_slug("blog_categories", "space").await.unwrap(), "space-3");
        assert_eq!(svc.unique_slug("blog_categories", "stars").await.unwrap(), "stars");
        assert_eq!(svc.unique_slug("blog_categories", "").await.unwrap(), "untitled");
    }

    #[tokio::test]
    async fn count_returns_scalar() {
        let svc = test_service().await;
        let n = svc.count("SELECT COUNT(*) FROM users", Vec::new()).await.unwrap();
        assert_eq!(n, 0);
    }
}
