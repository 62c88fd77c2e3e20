//! Database error types for orr-db.

use orr_core::errors::ValidationErrors;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a stored value could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Submitted data was rejected before anything was written.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A UNIQUE constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl From<ValidationErrors> for DatabaseError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl DatabaseError {
    /// Turn a UNIQUE-constraint failure into `Conflict`, pass anything else through.
    pub(crate) fn from_write(err: libsql::Error, what: &str) -> Self {
        if err.to_string().contains("UNIQUE constraint failed") {
            Self::Conflict(format!("{what} already exists"))
        } else {
            Self::LibSql(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = libsql::Error::SqliteFailure(
            2067,
            "UNIQUE constraint failed: budgets.user_id, budgets.category_id".into(),
        );
        match DatabaseError::from_write(err, "budget") {
            DatabaseError::Conflict(message) => assert_eq!(message, "budget already exists"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_write_failures_pass_through() {
        let err = libsql::Error::SqliteFailure(19, "NOT NULL constraint failed: budgets.amount".into());
        assert!(matches!(
            DatabaseError::from_write(err, "budget"),
            DatabaseError::LibSql(_)
        ));
    }
}
