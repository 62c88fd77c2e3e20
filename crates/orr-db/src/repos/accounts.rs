//! User and login-session repository.

use chrono::{DateTime, Utc};

use orr_core::entities::{Session, User};
use orr_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime};
use crate::service::OrrService;

const USER_COLS: &str = "id, username, password_hash, is_staff, created_at";
const SESSION_COLS: &str = "token, user_id, created_at, expires_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        is_staff: get_bool(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn row_to_session(row: &libsql::Row) -> Result<Session, DatabaseError> {
    Ok(Session {
        token: row.get(0)?,
        user_id: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
        expires_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl OrrService {
    /// Store a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// `DatabaseError::Conflict` when the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_staff: bool,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({USER_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    username,
                    password_hash,
                    i64::from(is_staff),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_write(e, &format!("user '{username}'")))?;

        tracing::debug!(%id, username, "user created");
        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_staff,
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
                [username],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// Replace a user's password hash and drop their open sessions.
    pub async fn set_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                [password_hash, user_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.db()
            .conn()
            .execute("DELETE FROM sessions WHERE user_id = ?1", [user_id])
            .await?;
        tracing::debug!(user_id, "password changed, sessions revoked");
        Ok(())
    }

    pub async fn create_session(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO sessions ({SESSION_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![token, user_id, now.to_rfc3339(), expires_at.to_rfc3339()],
            )
            .await?;
        tracing::debug!(user_id, "session opened");
        Ok(Session {
            token: token.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at,
        })
    }

    pub async fn get_session(&self, token: &str) -> Result<Session, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SESSION_COLS} FROM sessions WHERE token = ?1"),
                [token],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_session(&row)
    }

    /// Resolve a session token to its user.
    ///
    /// Expired sessions are deleted and reported as `NoResult`.
    pub async fn user_for_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<User, DatabaseError> {
        let session = self.get_session(token).await?;
        if session.is_expired(now) {
            self.delete_session(token).await?;
            return Err(DatabaseError::NoResult);
        }
        self.get_user(&session.user_id).await
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", [token])
            .await?;
        Ok(())
    }

    /// Remove every session that expired at or before `now`.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                [now.to_rfc3339()],
            )
            .await?;
        if removed > 0 {
            tracing::debug!(removed, "expired sessions purged");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use crate::error::DatabaseError;
    use crate::test_support::helpers::{test_service, test_user};

    #[tokio::test]
    async fn create_and_lookup_user() {
        let svc = test_service().await;
        let user = test_user(&svc, "ada").await;

        let by_id = svc.get_user(&user.id).await.unwrap();
        let by_name = svc.get_user_by_username("ada").await.unwrap();
        assert_eq!(by_id.id, by_name.id);
        assert!(by_name.is_staff);
        assert!(user.id.starts_with("usr-"));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = test_service().await;
        test_user(&svc, "ada").await;
        let err = svc.create_user("ada", "x", false).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_user_is_no_result() {
        let svc = test_service().await;
        let err = svc.get_user_by_username("nobody").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }

    #[tokio::test]
    async fn session_resolves_until_expiry() {
        let svc = test_service().await;
        let user = test_user(&svc, "ada").await;
        let now = chrono::Utc::now();
        svc.create_session(&user.id, "tok-live", now + Duration::hours(1))
            .await
            .unwrap();

        let resolved = svc.user_for_session("tok-live", now).await.unwrap();
        assert_eq!(resolved.id, user.id);

        let err = svc
            .user_for_session("tok-live", now + Duration::hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
        assert!(matches!(
            svc.get_session("tok-live").await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn password_change_revokes_sessions() {
        let svc = test_service().await;
        let user = test_user(&svc, "ada").await;
        let now = chrono::Utc::now();
        svc.create_session(&user.id, "tok-a", now + Duration::hours(1))
            .await
            .unwrap();

        svc.set_password_hash(&user.id, "$2b$04$new").await.unwrap();

        assert_eq!(svc.get_user(&user.id).await.unwrap().password_hash, "$2b$04$new");
        assert!(svc.get_session("tok-a").await.is_err());
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let svc = test_service().await;
        let user = test_user(&svc, "ada").await;
        let now = chrono::Utc::now();
        svc.create_session(&user.id, "old", now - Duration::minutes(1))
            .await
            .unwrap();
        svc.create_session(&user.id, "new", now + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(svc.purge_expired_sessions(now).await.unwrap(), 1);
        assert!(svc.get_session("new").await.is_ok());
    }
}
