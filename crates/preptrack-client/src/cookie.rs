//! Session cookie model.
//!
//! The identity service issues the session token as a cookie scoped to the
//! whole `preptrack.app` domain. The client sends it back on every request
//! and expires it on logout.

use std::fmt;

pub const COOKIE_NAME: &str = "token";
pub const COOKIE_DOMAIN: &str = ".preptrack.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// `Some(0)` expires the cookie immediately.
    pub max_age: Option<i64>,
}

// Keeps tokens out of logs.
impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("value", &"***")
            .field("path", &self.path)
            .field("domain", &self.domain)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionCookie {
    /// The cookie as issued at login.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            value: token.into(),
            path: "/".to_string(),
            domain: COOKIE_DOMAIN.to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::None,
            max_age: None,
        }
    }

    /// The same cookie with an empty value that expires immediately.
    pub fn cleared() -> Self {
        Self {
            max_age: Some(0),
            ..Self::new("")
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.value.is_empty() && self.max_age == Some(0)
    }

    /// Value for a request `Cookie` header.
    pub fn request_value(&self) -> String {
        format!("{COOKIE_NAME}={}", self.value)
    }

    /// Value for a `Set-Cookie` header.
    pub fn to_header(&self) -> String {
        let mut header = format!(
            "{COOKIE_NAME}={}; Path={}; Domain={}",
            self.value, self.path, self.domain
        );
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header.push_str(&format!("; SameSite={}", self.same_site));
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={max_age}"));
            if max_age <= 0 {
                header.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
            }
        }
        header
    }
}
