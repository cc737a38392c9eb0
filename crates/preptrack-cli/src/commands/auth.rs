//! The `preptrack login`, `signup`, and `logout` commands.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use preptrack_client::CachedSession;
use preptrack_core::ApiError;

use super::{api_failure, connect, prompt_line};

async fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt_line("Password: ").await,
    }
}

pub async fn login(email: String, password: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;
    let password = password_or_prompt(password).await?;

    let session = ctx
        .client
        .login(&email, &password)
        .await
        .map_err(api_failure)?;
    let name = session.user.name.clone();
    ctx.cache.store(&CachedSession::from(session))?;

    println!("Logged in as {name}.");
    Ok(())
}

pub async fn signup(
    name: String,
    email: String,
    password: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;
    let password = password_or_prompt(password).await?;

    let session = ctx
        .client
        .signup(&name, &email, &password)
        .await
        .map_err(api_failure)?;
    let name = session.user.name.clone();
    ctx.cache.store(&CachedSession::from(session))?;

    println!("Welcome, {name}! Your account is ready.");
    Ok(())
}

pub async fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;

    match ctx.client.logout().await {
        Ok(cookie) => {
            debug!(set_cookie = %cookie.to_header(), "session cookie expired");
        }
        Err(ApiError::MissingPrerequisite(_)) => {
            println!("Not logged in.");
            return Ok(());
        }
        Err(e) => {
            // The local copy goes either way so a dead token is never reused.
            ctx.cache.clear()?;
            return Err(api_failure(e));
        }
    }

    if ctx.cache.clear()? {
        info!(path = %ctx.cache.path().display(), "profile cache cleared");
    }
    println!("Logged out.");
    Ok(())
}
