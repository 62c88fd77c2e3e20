//! # orr-auth
//!
//! Credentials for the staff login.
//!
//! Passwords are stored as bcrypt hashes. A successful login mints an opaque
//! random token that is kept in the `sessions` table and handed to the
//! browser as a cookie; nothing about the user is encoded in the token.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{MIN_PASSWORD_LEN, hash_password, validate_new_password, verify_password};
pub use token::{TOKEN_BYTES, new_session_token, session_expiry};
