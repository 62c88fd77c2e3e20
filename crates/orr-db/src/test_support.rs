//! Shared test utilities for orr-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use orr_core::entities::User;

    use crate::OrrDb;
    use crate::service::OrrService;

    /// In-memory service with a fresh schema.
    pub async fn test_service() -> OrrService {
        let db = OrrDb::open_local(":memory:").await.unwrap();
        OrrService::from_db(db)
    }

    /// Create a user to own posts, research projects, and finance rows.
    pub async fn test_user(svc: &OrrService, username: &str) -> User {
        svc.create_user(username, "$2b$04$not-a-real-hash", true)
            .await
            .unwrap()
    }
}
