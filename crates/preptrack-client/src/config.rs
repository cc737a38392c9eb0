//! Client configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level preptrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreptrackConfig {
    /// Base URL of the identity service (auth, profile).
    #[serde(default = "default_identity_url")]
    pub identity_base_url: String,
    /// Base URL of the core service (exams, evaluation, study content).
    #[serde(default = "default_core_url")]
    pub core_base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Where the signed-in profile and session token are cached.
    #[serde(default = "default_profile_cache")]
    pub profile_cache: PathBuf,
    /// Default for `take --init`.
    #[serde(default)]
    pub is_init: bool,
}

fn default_identity_url() -> String {
    "https://identity.preptrack.app".to_string()
}
fn default_core_url() -> String {
    "https://core.preptrack.app".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_profile_cache() -> PathBuf {
    dirs_path()
        .map(|d| d.join("profile.json"))
        .unwrap_or_else(|| PathBuf::from(".preptrack-profile.json"))
}

impl Default for PreptrackConfig {
    fn default() -> Self {
        Self {
            identity_base_url: default_identity_url(),
            core_base_url: default_core_url(),
            timeout_secs: default_timeout(),
            profile_cache: default_profile_cache(),
            is_init: false,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `preptrack.toml` in the current directory
/// 2. `~/.config/preptrack/config.toml`
///
/// Environment variable overrides: `PREPTRACK_IDENTITY_URL`, `PREPTRACK_CORE_URL`.
pub fn load_config() -> Result<PreptrackConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PreptrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("preptrack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PreptrackConfig::default(),
    };

    if let Ok(url) = std::env::var("PREPTRACK_IDENTITY_URL") {
        config.identity_base_url = url;
    }
    if let Ok(url) = std::env::var("PREPTRACK_CORE_URL") {
        config.core_base_url = url;
    }

    config.identity_base_url = resolve_env_vars(&config.identity_base_url);
    config.core_base_url = resolve_env_vars(&config.core_base_url);
    anyhow::ensure!(config.timeout_secs >= 1, "timeout_secs must be at least 1");

    Ok(config)
}

/// Parse a TOML string into a config without touching the environment.
pub fn parse_config(content: &str) -> Result<PreptrackConfig> {
    Ok(toml::from_str::<PreptrackConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("preptrack"))
}
