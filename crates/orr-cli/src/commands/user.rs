use std::io::BufRead;

use anyhow::Context;
use orr_config::OrreryConfig;
use serde::Serialize;

use crate::cli::subcommands::UserCommands;
use crate::output::output;

#[derive(Serialize)]
struct PasswordChanged {
    username: String,
    sessions_revoked: bool,
}

/// Handle `orrery user <subcommand>`.
pub async fn handle(action: &UserCommands, config: &OrreryConfig) -> anyhow::Result<()> {
    match action {
        UserCommands::Create {
            username,
            staff,
            password,
        } => {
            let username = username.trim();
            anyhow::ensure!(!username.is_empty(), "username must not be blank");
            let hash = hash_for(password.as_deref(), config).await?;

            let service = super::open_service(config).await?;
            let user = service
                .create_user(username, &hash, *staff)
                .await
                .with_context(|| format!("failed to create user '{username}'"))?;
            tracing::info!(id = %user.id, username, "user created");
            output(&user)
        }
        UserCommands::Passwd { username, password } => {
            let service = super::open_service(config).await?;
            let user = service
                .get_user_by_username(username.trim())
                .await
                .with_context(|| format!("no user named '{}'", username.trim()))?;
            let hash = hash_for(password.as_deref(), config).await?;
            service.set_password_hash(&user.id, &hash).await?;
            output(&PasswordChanged {
                username: user.username,
                sessions_revoked: true,
            })
        }
    }
}

/// Validate the password (from the flag or stdin) and hash it off the
/// async runtime at the configured cost.
async fn hash_for(password: Option<&str>, config: &OrreryConfig) -> anyhow::Result<String> {
    let password = match password {
        Some(password) => password.to_string(),
        None => read_password_line()?,
    };
    orr_auth::validate_new_password(&password)?;

    let cost = config.auth.bcrypt_cost;
    let hash = tokio::task::spawn_blocking(move || orr_auth::hash_password(&password, cost))
        .await
        .context("password hashing task failed")??;
    Ok(hash)
}

fn read_password_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
