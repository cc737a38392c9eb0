//! Shared HTTP client for the identity and core services.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use preptrack_core::ApiError;

use crate::config::PreptrackConfig;
use crate::cookie::SessionCookie;
use crate::envelope;

/// Which backend a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Auth and profile.
    Identity,
    /// Exams, evaluation, study guides, test paths.
    Core,
}

/// REST client for both preptrack services.
///
/// Every call is sent once; there are no retries.
#[derive(Clone)]
pub struct ApiClient {
    identity: Url,
    core: Url,
    timeout_secs: u64,
    session: Option<SessionCookie>,
    client: reqwest::Client,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("identity", &self.identity.as_str())
            .field("core", &self.core.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("authenticated", &self.session.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &PreptrackConfig) -> Result<Self> {
        let identity = parse_base_url(&config.identity_base_url)?;
        let core = parse_base_url(&config.core_base_url)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            identity,
            core,
            timeout_secs: config.timeout_secs,
            session: None,
            client,
        })
    }

    /// Attach a session token, sent as the session cookie on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.session = Some(SessionCookie::new(token));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Fail locally when a call needs a signed-in user.
    pub(crate) fn require_session(&self) -> Result<(), ApiError> {
        match &self.session {
            Some(cookie) if !cookie.value.is_empty() => Ok(()),
            _ => Err(ApiError::MissingPrerequisite(
                "you must be logged in".to_string(),
            )),
        }
    }

    /// Build a URL from percent-encoded path segments.
    pub(crate) fn url(&self, service: Service, segments: &[&str]) -> Url {
        let mut url = match service {
            Service::Identity => self.identity.clone(),
            Service::Core => self.core.clone(),
        };
        // Base URLs are checked in `new`, so they always accept segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.execute(Method::GET, url, None::<&()>).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(method, url, Some(body)).await
    }

    async fn execute<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder: RequestBuilder = self.client.request(method.clone(), url.clone());
        if let Some(cookie) = &self.session {
            builder = builder.header(COOKIE, cookie.request_value());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;

        debug!(%method, path = url.path(), status, "response received");
        envelope::decode(status, &text)
    }

    fn transport_error(&self, method: &Method, url: &Url, e: reqwest::Error) -> ApiError {
        warn!(%method, path = url.path(), error = %e, "request failed");
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"))?;
    anyhow::ensure!(!url.cannot_be_a_base(), "invalid base URL: {raw}");
    Ok(url)
}

/// Fail locally when a required identifier is blank.
pub(crate) fn require_id(value: &str, what: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::MissingPrerequisite(format!("{what} is required")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_client(uri: &str) -> ApiClient {
    let config = PreptrackConfig {
        identity_base_url: uri.to_string(),
        core_base_url: uri.to_string(),
        timeout_secs: 5,
        ..Default::default()
    };
    ApiClient::new(&config).unwrap()
}
