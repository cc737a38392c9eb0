//! API and session error types.
//!
//! `ApiError` is defined in `preptrack-core` so the session controller can
//! classify failures from any `ExamApi` implementation without string
//! matching. Transport failures keep their kind but share one user-facing
//! message.

use thiserror::Error;

/// Message shown to users for any transport-level failure.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Errors returned by the REST wrappers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// A form field failed a local check before any request was made.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The service answered with `success: false`. Holds the server text verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Something the call needs was missing; no request was sent.
    #[error("{0}")]
    MissingPrerequisite(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status without a readable envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Text suitable for an alert or toast.
    ///
    /// Server and local messages pass through unchanged; transport failures
    /// collapse to [`UNEXPECTED_ERROR`].
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { .. }
            | ApiError::Rejected(_)
            | ApiError::MissingPrerequisite(_) => self.to_string(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }

    /// Returns `true` for failures below the envelope (timeouts, HTTP, decode, network).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout(_) | ApiError::Http { .. } | ApiError::Decode(_) | ApiError::Network(_)
        )
    }
}

/// Errors raised by the exam session controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The requested transition is not allowed from the current state.
    #[error("cannot {action} while {state}")]
    InvalidState { action: &'static str, state: String },

    /// No exam page is loaded.
    #[error("no exam is loaded")]
    NoExamLoaded,

    /// Recording a new question would exceed the exam's question count.
    #[error("attempt buffer is full ({capacity} questions)")]
    BufferFull { capacity: usize },

    /// The chosen answer does not belong to the current question.
    #[error("answer {answer_id} is not an option for question {question_id}")]
    UnknownAnswer {
        question_id: String,
        answer_id: String,
    },
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
