//! Session cookie handling and the signed-in user extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use chrono::Utc;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use orr_config::AuthConfig;
use orr_core::entities::User;
use orr_db::error::DatabaseError;

use crate::error::WebError;
use crate::state::AppState;

/// The user behind a valid session cookie.
///
/// Extracting it from a request without a live session rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(WebError::Unauthenticated)?;
        match state.service.user_for_session(&token, Utc::now()).await {
            Ok(user) => Ok(Self(user)),
            Err(DatabaseError::NoResult) => Err(WebError::Unauthenticated),
            Err(e) => Err(e.into()),
        }
    }
}

/// Value of the session cookie named `name`, if the request carries one.
#[must_use]
pub fn session_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// `Set-Cookie` value carrying a freshly minted session token.
#[must_use]
pub fn session_cookie(auth: &AuthConfig, token: String) -> String {
    let max_age = i64::try_from(auth.session_ttl_hours).unwrap_or(i64::MAX / 3600);
    Cookie::build((auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(auth.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(max_age))
        .build()
        .to_string()
}

/// `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn removal_cookie(auth: &AuthConfig) -> String {
    let mut cookie = Cookie::build((auth.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie.to_string()
}
