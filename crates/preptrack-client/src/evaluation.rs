//! Core service: exam evaluation.

use reqwest::Method;
use tracing::{info, instrument};

use preptrack_core::model::{EvaluationRequest, EvaluationResult};
use preptrack_core::ApiError;

use crate::http::{require_id, ApiClient, Service};

impl ApiClient {
    /// Submit collected attempts and receive the score summary.
    #[instrument(skip(self, request), fields(exam_id = %request.exam_id, responses = request.responses.len()))]
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ApiError> {
        self.require_session()?;
        require_id(&request.exam_id, "exam id")?;

        let result: EvaluationResult = self
            .send_json(Method::POST, self.url(Service::Core, &["evaluations"]), request)
            .await?;
        info!(evaluation_id = %result.id, score = result.score_percentage, "evaluation received");
        Ok(result)
    }

    /// Look up a past evaluation.
    #[instrument(skip(self))]
    pub async fn get_evaluation(&self, evaluation_id: &str) -> Result<EvaluationResult, ApiError> {
        self.require_session()?;
        require_id(evaluation_id, "evaluation id")?;
        self.get(self.url(Service::Core, &["evaluations", evaluation_id]))
            .await
    }
}
