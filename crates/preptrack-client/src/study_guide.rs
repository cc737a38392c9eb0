//! Core service: study guides.

use tracing::instrument;

use preptrack_core::model::StudyGuide;
use preptrack_core::ApiError;

use crate::http::{require_id, ApiClient, Service};

impl ApiClient {
    /// Study guides attached to an exam.
    #[instrument(skip(self))]
    pub async fn list_study_guides(&self, exam_id: &str) -> Result<Vec<StudyGuide>, ApiError> {
        require_id(exam_id, "exam id")?;
        let mut url = self.url(Service::Core, &["study-guides"]);
        url.query_pairs_mut().append_pair("exam_id", exam_id);
        self.get(url).await
    }

    #[instrument(skip(self))]
    pub async fn get_study_guide(&self, guide_id: &str) -> Result<StudyGuide, ApiError> {
        require_id(guide_id, "study guide id")?;
        self.get(self.url(Service::Core, &["study-guides", guide_id]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn lists_guides_for_exam() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/study-guides"))
            .and(query_param("exam_id", "gre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"id": "g1", "exam_id": "gre", "title": "Ratios", "sections": [
                        {"heading": "Basics", "body": "A ratio compares...", "concepts": ["ratios"]}
                    ]},
                    {"id": "g2", "exam_id": "gre", "title": "Geometry"}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let guides = client.list_study_guides("gre").await.unwrap();
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0].sections[0].concepts, vec!["ratios"]);
        assert!(guides[1].sections.is_empty());
    }

    #[tokio::test]
    async fn unknown_guide_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/study-guides/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "data": {"message": "Study guide not found"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_study_guide("nope").await.unwrap_err();
        assert_eq!(err, ApiError::Rejected("Study guide not found".into()));
    }
}
