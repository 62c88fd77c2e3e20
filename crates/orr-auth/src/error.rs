use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("random source unavailable: {0}")]
    Random(String),
}
