//! Subcommand implementations.

pub mod auth;
pub mod init;
pub mod profile;
pub mod result;
pub mod study_guide;
pub mod take;
pub mod test_path;

use std::path::Path;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use preptrack_client::{load_config_from, ApiClient, CachedSession, PreptrackConfig, ProfileCache};
use preptrack_core::{ApiError, SessionError};

/// Everything a command needs to talk to the backend.
pub(crate) struct Context {
    pub config: PreptrackConfig,
    pub client: ApiClient,
    pub cache: ProfileCache,
    pub cached: Option<CachedSession>,
}

/// Load config, build the client, and attach the cached session token.
pub(crate) fn connect(config_path: Option<&Path>) -> Result<Context> {
    let config = load_config_from(config_path)?;
    let cache = ProfileCache::new(&config.profile_cache);
    let cached = cache.load()?;

    let mut client = ApiClient::new(&config)?;
    if let Some(session) = &cached {
        client = client.with_token(session.token.clone());
    }
    debug!(?client, "client ready");

    Ok(Context {
        config,
        client,
        cache,
        cached,
    })
}

/// Turn a client error into the text a user should see.
pub(crate) fn api_failure(e: ApiError) -> anyhow::Error {
    debug!(error = ?e, "request failed");
    anyhow::anyhow!(e.user_message())
}

pub(crate) fn session_failure(e: SessionError) -> anyhow::Error {
    debug!(error = ?e, "session step failed");
    anyhow::anyhow!(e.user_message())
}

/// Print `prompt` to stderr and read one line from stdin.
pub(crate) async fn prompt_line(prompt: &str) -> Result<String> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(prompt.as_bytes()).await?;
    stderr.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines.next_line().await?;
    line.map(|l| l.trim_end().to_string())
        .ok_or_else(|| anyhow::anyhow!("no input on stdin"))
}
