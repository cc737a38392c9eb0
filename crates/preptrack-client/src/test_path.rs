//! Core service: the learner's test path.

use tracing::instrument;

use preptrack_core::model::TestPath;
use preptrack_core::ApiError;

use crate::http::{require_id, ApiClient, Service};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn get_test_path(&self, exam_id: &str) -> Result<TestPath, ApiError> {
        self.require_session()?;
        require_id(exam_id, "exam id")?;
        self.get(self.url(Service::Core, &["test-paths", exam_id]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_path_and_finds_next_stage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test-paths/gre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "exam_id": "gre",
                    "stages": [
                        {"id": "s1", "title": "Diagnostic", "exam_ids": ["gre-diag"], "completed": true},
                        {"id": "s2", "title": "Quant drills", "exam_ids": ["gre-q1", "gre-q2"]},
                        {"id": "s3", "title": "Mock test", "locked": true}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri()).with_token("tok");
        let path = client.get_test_path("gre").await.unwrap();
        assert_eq!(path.stages.len(), 3);
        assert_eq!(path.next_stage().unwrap().id, "s2");
    }

    #[tokio::test]
    async fn needs_login() {
        let client = test_client("http://127.0.0.1:9");
        assert!(client.get_test_path("gre").await.is_err());
    }
}
