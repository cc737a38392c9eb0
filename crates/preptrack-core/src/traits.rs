//! Core trait definitions.
//!
//! `ExamApi` is the seam between the session controller and the network.
//! `preptrack-client` implements it over HTTP; tests substitute fakes.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{EvaluationRequest, EvaluationResult, Exam};

/// Remote operations an exam session needs.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Fetch one page of an exam. Pages are 1-based.
    async fn fetch_exam(&self, exam_id: &str, page: u32) -> Result<Exam, ApiError>;

    /// Submit the collected attempts for scoring.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ApiError>;
}
