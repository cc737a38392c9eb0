//! Identity service: login, signup, logout.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use preptrack_core::model::UserProfile;
use preptrack_core::ApiError;

use crate::cookie::SessionCookie;
use crate::http::{ApiClient, Service};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 100;

/// Token and profile returned by a successful login or signup.
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

fn invalid(field: &str, message: &str) -> ApiError {
    ApiError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(invalid("email", "is required"));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid("email", "must be a valid email address"))
    }
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(
            "password",
            &format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name", "is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(invalid(
            "name",
            &format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

impl ApiClient {
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        validate_email(email)?;
        validate_password(password)?;

        let body = LoginRequest {
            email: email.trim(),
            password,
        };
        let session: AuthSession = self
            .send_json(Method::POST, self.url(Service::Identity, &["auth", "login"]), &body)
            .await?;
        info!(user_id = %session.user.id, "logged in");
        Ok(session)
    }

    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password)?;

        let body = SignupRequest {
            name: name.trim(),
            email: email.trim(),
            password,
        };
        let session: AuthSession = self
            .send_json(Method::POST, self.url(Service::Identity, &["auth", "signup"]), &body)
            .await?;
        info!(user_id = %session.user.id, "account created");
        Ok(session)
    }

    /// End the server-side session.
    ///
    /// Returns the expiring cookie that replaces the session cookie.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<SessionCookie, ApiError> {
        self.require_session()?;
        let _: serde::de::IgnoredAny = self
            .send_json(
                Method::POST,
                self.url(Service::Identity, &["auth", "logout"]),
                &serde_json::json!({}),
            )
            .await?;
        info!("logged out");
        Ok(SessionCookie::cleared())
    }
}
