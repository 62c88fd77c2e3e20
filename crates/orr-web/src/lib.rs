//! # orr-web
//!
//! HTTP surface for Orrery, built on axum.
//!
//! Public pages (portfolio, blog, astronomy gallery and observation log)
//! need no login. Research and finance pages resolve the session cookie
//! into a [`session::CurrentUser`] and answer 401 without one. All
//! responses are JSON except the research CSV export; failures map onto
//! status codes through [`error::WebError`].

pub mod csv;
pub mod error;
pub mod handlers;
pub mod json;
mod router;
pub mod session;
pub mod state;

use std::net::SocketAddr;

pub use error::WebError;
pub use router::router;
pub use state::AppState;

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns the I/O error when the address cannot be bound or the server
/// stops abnormally.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
