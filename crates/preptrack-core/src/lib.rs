//! preptrack-core: exam session state, stores, and data model.
//!
//! This crate defines the data model, the error taxonomy, the `ExamApi`
//! seam, and the session controller that drives a learner through an exam.
//! It performs no I/O of its own; `preptrack-client` supplies the HTTP side.

pub mod countdown;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod traits;

pub use error::{ApiError, SessionError, UNEXPECTED_ERROR};
pub use session::{Advance, ExamSession, SelectOutcome, SessionOptions, SessionState};
pub use store::{AttemptBuffer, ExamDataStore, LoadTicket};
pub use traits::ExamApi;
