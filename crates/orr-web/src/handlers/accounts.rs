//! Login, logout and the signed-in landing page.

use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, IntoResponse};
use chrono::Utc;
use orr_core::entities::User;
use orr_core::inputs::LoginInput;
use orr_db::error::DatabaseError;
use serde::Serialize;

use crate::error::{WebError, WebResult};
use crate::json::Json;
use crate::session::{CurrentUser, removal_cookie, session_cookie, session_token};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub user: User,
    pub expires_at: chrono::DateTime<Utc>,
}

/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> WebResult<impl IntoResponse> {
    let user = match state.service.get_user_by_username(input.username.trim()).await {
        Ok(user) => user,
        Err(DatabaseError::NoResult) => {
            tracing::info!(username = %input.username, "login for unknown user");
            return Err(WebError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    let hash = user.password_hash.clone();
    let password = input.password;
    let verified =
        tokio::task::spawn_blocking(move || orr_auth::verify_password(&password, &hash)).await?;
    if !verified {
        tracing::info!(username = %user.username, "login rejected");
        return Err(WebError::InvalidCredentials);
    }

    let token = orr_auth::new_session_token()?;
    let expires_at = orr_auth::session_expiry(Utc::now(), state.config.auth.session_ttl_hours);
    state
        .service
        .create_session(&user.id, &token, expires_at)
        .await?;
    tracing::info!(username = %user.username, "signed in");

    let cookie = session_cookie(&state.config.auth, token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResult { user, expires_at }),
    ))
}

#[derive(Debug, Serialize)]
pub struct LogoutResult {
    pub logged_out: bool,
}

/// POST /logout/
///
/// Always clears the cookie; a stale or missing session is not an error.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> WebResult<impl IntoResponse> {
    let token = session_token(&headers, &state.config.auth.cookie_name);
    if let Some(ref token) = token {
        state.service.delete_session(token).await?;
    }
    Ok((
        AppendHeaders([(header::SET_COOKIE, removal_cookie(&state.config.auth))]),
        Json(LogoutResult {
            logged_out: token.is_some(),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct DashboardSection {
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user: User,
    pub sections: [DashboardSection; 2],
}

/// GET /dashboard/
pub async fn dashboard(CurrentUser(user): CurrentUser) -> Json<DashboardPage> {
    Json(DashboardPage {
        user,
        sections: [
            DashboardSection {
                name: "Research",
                url: "/research/",
            },
            DashboardSection {
                name: "Finance",
                url: "/finance/",
            },
        ],
    })
}
