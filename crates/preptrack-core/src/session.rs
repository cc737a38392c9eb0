//! Exam-taking session controller.
//!
//! Drives one learner through an exam: loads pages on demand, accepts one
//! answer per question, records attempts, and posts the collected attempts
//! for evaluation once the last question is passed.
//!
//! ```text
//! LoadingInitial ─► PresentingQuestion ─► AnswerSelected
//!                        ▲     │ skip / countdown      │ advance
//!                        │     ▼                       ▼
//!                        ├── next question ◄───────────┤
//!                        └── FetchingNextPage ◄────────┤
//!                                                      ▼
//!                                 SubmittingFinal ─► Finished
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::countdown::countdown_for;
use crate::error::{ApiError, SessionError};
use crate::model::{Attempt, EvaluationRequest, EvaluationResult, Question};
use crate::store::{AttemptBuffer, ExamDataStore};
use crate::traits::ExamApi;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the first page of the exam.
    LoadingInitial,
    /// A question is shown and no answer has been chosen.
    PresentingQuestion,
    /// An answer was chosen and feedback is showing.
    AnswerSelected,
    /// The current page is exhausted and the next one is being fetched.
    FetchingNextPage,
    /// The last question was passed; attempts are ready to submit.
    SubmittingFinal,
    /// Terminal: results delivered or the learner left.
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::LoadingInitial => write!(f, "loading-initial"),
            SessionState::PresentingQuestion => write!(f, "presenting-question"),
            SessionState::AnswerSelected => write!(f, "answer-selected"),
            SessionState::FetchingNextPage => write!(f, "fetching-next-page"),
            SessionState::SubmittingFinal => write!(f, "submitting-final"),
            SessionState::Finished => write!(f, "finished"),
        }
    }
}

/// Result of choosing an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The answer was recorded for the current question.
    Accepted {
        correct: bool,
        correct_answer_id: String,
    },
    /// An answer was already chosen for this question; nothing changed.
    Ignored,
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the next question on the loaded page.
    NextQuestion,
    /// Loaded the next page and moved to its first question.
    NextPage,
    /// Passed the last question and the evaluation succeeded.
    Finished(EvaluationResult),
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Sent with the evaluation to mark a placement run.
    pub is_init: bool,
}

/// One learner's pass through one exam.
pub struct ExamSession {
    id: Uuid,
    exam_id: String,
    options: SessionOptions,
    api: Arc<dyn ExamApi>,
    exam_data: ExamDataStore,
    attempts: AttemptBuffer,
    state: SessionState,
    /// Index of the current question within the loaded page.
    index: usize,
    /// Questions on pages before the loaded one.
    offset: usize,
    /// Offset to use once the pending page fetch lands.
    next_offset: usize,
    pending: Option<Attempt>,
    question_started: Instant,
    result: Option<EvaluationResult>,
}

impl ExamSession {
    pub fn new(api: Arc<dyn ExamApi>, exam_id: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            exam_id: exam_id.into(),
            options,
            api,
            exam_data: ExamDataStore::new(),
            attempts: AttemptBuffer::new(),
            state: SessionState::LoadingInitial,
            index: 0,
            offset: 0,
            next_offset: 0,
            pending: None,
            question_started: Instant::now(),
            result: None,
        }
    }

    /// Start from previously loaded exam data instead of an empty store.
    pub fn with_exam_data(mut self, exam_data: ExamDataStore) -> Self {
        self.exam_data = exam_data;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn attempts(&self) -> &AttemptBuffer {
        &self.attempts
    }

    pub fn exam_data(&self) -> &ExamDataStore {
        &self.exam_data
    }

    /// The evaluation result once the session finished successfully.
    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::PresentingQuestion | SessionState::AnswerSelected => self
                .exam_data
                .exam()
                .and_then(|exam| exam.questions.get(self.index)),
            _ => None,
        }
    }

    /// 1-based position of the current question in the whole exam.
    pub fn question_number(&self) -> usize {
        self.offset + self.index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.exam_data.exam().map_or(0, |e| e.total_questions)
    }

    /// Time allowed for the current question.
    pub fn countdown(&self) -> Option<Duration> {
        self.current_question()
            .map(|q| countdown_for(q.avg_completion_secs))
    }

    /// Time spent on the current question so far.
    pub fn elapsed_on_question(&self) -> Duration {
        self.question_started.elapsed()
    }

    /// Load the exam and present its first question.
    ///
    /// Cached data for the same exam is reused; data for another exam is
    /// discarded and page 1 is fetched.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        self.expect_state("start", &[SessionState::LoadingInitial])?;

        if self.exam_id.trim().is_empty() {
            return Err(ApiError::MissingPrerequisite("exam id is required".into()).into());
        }

        if let Some(exam) = self.exam_data.exam() {
            if exam.id == self.exam_id {
                let offset = (exam.page.max(1) as usize - 1)
                    * exam.page_size.unwrap_or(exam.questions.len());
                info!(session = %self.id, exam_id = %self.exam_id, page = exam.page, "reusing cached exam");
                self.enter_page(offset);
                return Ok(());
            }
            debug!(session = %self.id, cached = %exam.id, "discarding cached exam");
            self.exam_data.clear();
        }

        self.next_offset = 0;
        self.load_page(1).await
    }

    /// Choose an answer for the current question.
    ///
    /// Only the first choice per question counts; later calls return
    /// [`SelectOutcome::Ignored`].
    pub fn select_answer(&mut self, answer_id: &str) -> Result<SelectOutcome, SessionError> {
        if self.state == SessionState::AnswerSelected {
            return Ok(SelectOutcome::Ignored);
        }
        self.expect_state("select an answer", &[SessionState::PresentingQuestion])?;

        let question = self.current_question().ok_or(SessionError::NoExamLoaded)?;
        if !question.has_answer(answer_id) {
            return Err(SessionError::UnknownAnswer {
                question_id: question.id.clone(),
                answer_id: answer_id.to_string(),
            });
        }

        let correct = question.is_correct(answer_id);
        let correct_answer_id = question.correct_answer.id.clone();
        let attempt = Attempt {
            question_id: question.id.clone(),
            answer_id: answer_id.to_string(),
            time_taken: self.question_started.elapsed().as_secs_f64(),
        };
        debug!(
            session = %self.id,
            question_id = %attempt.question_id,
            correct,
            "answer selected"
        );

        self.pending = Some(attempt);
        self.state = SessionState::AnswerSelected;
        Ok(SelectOutcome::Accepted {
            correct,
            correct_answer_id,
        })
    }

    /// Move past the current question without answering it.
    pub async fn skip(&mut self) -> Result<Advance, SessionError> {
        self.expect_state("skip", &[SessionState::PresentingQuestion])?;
        self.advance().await
    }

    /// Handle the countdown elapsing.
    ///
    /// Behaves exactly like [`skip`](Self::skip) when no answer was chosen.
    /// Returns `None` if the question was already answered or the session is
    /// elsewhere, since the timer may fire late.
    pub async fn countdown_expired(&mut self) -> Result<Option<Advance>, SessionError> {
        if self.state != SessionState::PresentingQuestion {
            return Ok(None);
        }
        info!(session = %self.id, question = self.question_number(), "countdown elapsed, skipping");
        self.advance().await.map(Some)
    }

    /// Record the chosen answer, if any, and move on.
    pub async fn advance(&mut self) -> Result<Advance, SessionError> {
        self.expect_state(
            "advance",
            &[SessionState::PresentingQuestion, SessionState::AnswerSelected],
        )?;

        if let Some(attempt) = self.pending.take() {
            self.attempts.add_response(attempt)?;
        }

        let (total, page_len) = {
            let exam = self.exam_data.exam().ok_or(SessionError::NoExamLoaded)?;
            (exam.total_questions, exam.questions.len())
        };

        if self.question_number() >= total {
            self.state = SessionState::SubmittingFinal;
            return self.submit().await.map(Advance::Finished);
        }

        if self.index + 1 < page_len {
            self.index += 1;
            self.begin_question();
            return Ok(Advance::NextQuestion);
        }

        self.next_offset = self.offset + page_len;
        self.state = SessionState::FetchingNextPage;
        let next_page = self.exam_data.exam().map_or(1, |e| e.page + 1);
        self.load_page(next_page).await?;

        if self.state == SessionState::SubmittingFinal {
            return self.submit().await.map(Advance::Finished);
        }
        Ok(Advance::NextPage)
    }

    /// Re-issue a page fetch that failed.
    ///
    /// A retried page that ends the exam submits, as [`advance`](Self::advance) does.
    pub async fn retry_fetch(&mut self) -> Result<Advance, SessionError> {
        match self.state {
            SessionState::LoadingInitial => self.start().await?,
            SessionState::FetchingNextPage => {
                let next_page = self.exam_data.exam().map_or(1, |e| e.page + 1);
                self.load_page(next_page).await?;
            }
            state => {
                return Err(SessionError::InvalidState {
                    action: "retry a page fetch",
                    state: state.to_string(),
                })
            }
        }

        if self.state == SessionState::SubmittingFinal {
            return self.submit().await.map(Advance::Finished);
        }
        Ok(Advance::NextPage)
    }

    /// Post every recorded attempt for evaluation.
    ///
    /// On success both stores are cleared and the session finishes. On
    /// failure nothing changes and the call may be repeated.
    pub async fn submit(&mut self) -> Result<EvaluationResult, SessionError> {
        self.expect_state("submit", &[SessionState::SubmittingFinal])?;

        let request = EvaluationRequest {
            exam_id: self.exam_id.clone(),
            is_init: self.options.is_init,
            responses: self.attempts.to_vec(),
        };
        info!(
            session = %self.id,
            exam_id = %self.exam_id,
            responses = request.responses.len(),
            is_init = request.is_init,
            "submitting attempts for evaluation"
        );

        match self.api.evaluate(&request).await {
            Ok(result) => {
                self.attempts.reset_responses();
                self.exam_data.clear();
                self.state = SessionState::Finished;
                self.result = Some(result.clone());
                info!(session = %self.id, score = result.score_percentage, "evaluation complete");
                Ok(result)
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "evaluation failed");
                Err(e.into())
            }
        }
    }

    /// Leave the exam, discarding loaded data and unsent attempts.
    pub fn exit(&mut self) {
        debug!(session = %self.id, state = %self.state, "leaving exam");
        self.attempts.reset_responses();
        self.exam_data.clear();
        self.pending = None;
        self.state = SessionState::Finished;
    }

    async fn load_page(&mut self, page: u32) -> Result<(), SessionError> {
        let ticket = self.exam_data.begin_load(&self.exam_id, page);
        debug!(session = %self.id, exam_id = %self.exam_id, page, "fetching exam page");

        match self.api.fetch_exam(&self.exam_id, page).await {
            Ok(exam) => {
                if self.exam_data.complete_load(&ticket, exam) {
                    self.enter_page(self.next_offset);
                }
                Ok(())
            }
            Err(e) => {
                self.exam_data.fail_load(&ticket);
                warn!(session = %self.id, page, error = %e, "failed to fetch exam page");
                Err(e.into())
            }
        }
    }

    fn enter_page(&mut self, offset: usize) {
        self.offset = offset;
        self.index = 0;

        let (total, has_questions) = match self.exam_data.exam() {
            Some(exam) => (exam.total_questions, !exam.questions.is_empty()),
            None => (0, false),
        };
        self.attempts.set_capacity(total);

        if has_questions && self.offset < total {
            self.begin_question();
        } else {
            self.pending = None;
            self.state = SessionState::SubmittingFinal;
        }
    }

    fn begin_question(&mut self) {
        self.pending = None;
        self.question_started = Instant::now();
        self.state = SessionState::PresentingQuestion;
    }

    fn expect_state(
        &self,
        action: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state.to_string(),
            })
        }
    }
}
