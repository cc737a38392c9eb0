//! preptrack-client: REST client for the preptrack services.
//!
//! Wraps the identity service (auth, profile) and the core service (exams,
//! evaluation, study guides, test paths) behind one `ApiClient`, decodes the
//! `{ success, data }` envelope, and implements `ExamApi` so an
//! `ExamSession` can run against the live backend.

pub mod auth;
pub mod cache;
pub mod config;
pub mod cookie;
pub mod envelope;
pub mod evaluation;
pub mod exam;
pub mod http;
pub mod profile;
pub mod study_guide;
pub mod test_path;

pub use auth::AuthSession;
pub use cache::{CachedSession, ProfileCache};
pub use config::{load_config, load_config_from, PreptrackConfig};
pub use cookie::SessionCookie;
pub use http::{ApiClient, Service};
