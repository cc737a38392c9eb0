//! Identity service: the signed-in user's profile.

use reqwest::Method;
use tracing::instrument;

use preptrack_core::model::{ProfileUpdate, UserProfile};
use preptrack_core::ApiError;

use crate::auth::validate_name;
use crate::http::{ApiClient, Service};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.require_session()?;
        self.get(self.url(Service::Identity, &["users", "me"])).await
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.require_session()?;
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        self.send_json(
            Method::PATCH,
            self.url(Service::Identity, &["users", "me"]),
            update,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "u1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "target_exam": "gre",
                    "created_at": "2026-01-05T10:00:00Z"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri()).with_token("tok");
        let profile = client.get_profile().await.unwrap();
        assert_eq!(profile.target_exam.as_deref(), Some("gre"));
        assert!(profile.created_at.is_some());
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/me"))
            .and(body_json(json!({"target_exam": "gmat"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "u1", "name": "Ada", "email": "ada@example.com", "target_exam": "gmat"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri()).with_token("tok");
        let update = ProfileUpdate {
            target_exam: Some("gmat".into()),
            ..Default::default()
        };
        let profile = client.update_profile(&update).await.unwrap();
        assert_eq!(profile.target_exam.as_deref(), Some("gmat"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_locally() {
        let client = test_client("http://127.0.0.1:9").with_token("tok");
        let update = ProfileUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        let err = client.update_profile(&update).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn profile_needs_login() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.get_profile().await.unwrap_err();
        assert_eq!(err.user_message(), "you must be logged in");
    }
}
