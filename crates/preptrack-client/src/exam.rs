//! Core service: exam pages.

use async_trait::async_trait;
use tracing::instrument;

use preptrack_core::model::{EvaluationRequest, EvaluationResult, Exam};
use preptrack_core::{ApiError, ExamApi};

use crate::http::{require_id, ApiClient, Service};

impl ApiClient {
    /// Fetch one page of an exam. Pages are 1-based.
    #[instrument(skip(self))]
    pub async fn get_exam(&self, exam_id: &str, page: u32) -> Result<Exam, ApiError> {
        require_id(exam_id, "exam id")?;
        if page == 0 {
            return Err(ApiError::Validation {
                field: "page".to_string(),
                message: "pages start at 1".to_string(),
            });
        }

        let mut url = self.url(Service::Core, &["exams", exam_id]);
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.get(url).await
    }
}

#[async_trait]
impl ExamApi for ApiClient {
    async fn fetch_exam(&self, exam_id: &str, page: u32) -> Result<Exam, ApiError> {
        self.get_exam(exam_id, page).await
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ApiError> {
        ApiClient::evaluate(self, request).await
    }
}
