//! Core data model types for preptrack.
//!
//! These mirror the payloads the core and identity services return inside
//! the response envelope, plus the attempt records the client builds up
//! while an exam is being taken.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of an exam as returned by the core service.
///
/// `questions` only holds the currently loaded page; `total_questions`
/// counts the whole exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    /// Exam identifier.
    pub id: String,
    /// Human-readable exam title.
    pub title: String,
    /// Number of questions across all pages.
    pub total_questions: usize,
    /// 1-based page number of `questions`.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Questions per full page. Falls back to the length of `questions`.
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Questions on this page, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_page() -> u32 {
    1
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub correct_answer: Answer,
    #[serde(default)]
    pub distractors: Vec<Answer>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Average time learners take on this question, in seconds.
    #[serde(default)]
    pub avg_completion_secs: f64,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl Question {
    /// All answer options sorted by answer id.
    ///
    /// Sorting keeps the correct answer's position independent of how the
    /// payload lists it.
    pub fn options(&self) -> Vec<&Answer> {
        let mut options: Vec<&Answer> = std::iter::once(&self.correct_answer)
            .chain(self.distractors.iter())
            .collect();
        options.sort_by(|a, b| a.id.cmp(&b.id));
        options
    }

    /// Whether `answer_id` is the correct answer.
    pub fn is_correct(&self, answer_id: &str) -> bool {
        self.correct_answer.id == answer_id
    }

    /// Whether `answer_id` is one of this question's options.
    pub fn has_answer(&self, answer_id: &str) -> bool {
        self.is_correct(answer_id) || self.distractors.iter().any(|a| a.id == answer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
}

/// Difficulty label attached to a question.
///
/// Labels other than the three known ones decode as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Unknown => write!(f, "unknown"),
        }
    }
}

/// A recorded answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub question_id: String,
    pub answer_id: String,
    /// Seconds spent on the question before answering.
    pub time_taken: f64,
}

/// Body posted to the evaluation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub exam_id: String,
    /// Marks the learner's first (placement) run of an exam.
    pub is_init: bool,
    pub responses: Vec<Attempt>,
}

/// Score summary computed by the evaluation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub id: String,
    pub exam_id: String,
    pub score_percentage: f64,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    /// Total seconds spent across answered questions.
    pub time_taken: f64,
    #[serde(default)]
    pub concepts: Vec<ConceptScore>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Per-concept share of the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptScore {
    pub concept: String,
    pub score_percentage: f64,
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub target_exam: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields a user may change on their profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_exam: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyGuide {
    pub id: String,
    pub exam_id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<StudySection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySection {
    pub heading: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub concepts: Vec<String>,
}

/// Ordered sequence of practice stages leading up to an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPath {
    pub exam_id: String,
    #[serde(default)]
    pub stages: Vec<TestPathStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPathStage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub exam_ids: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub locked: bool,
}

impl TestPath {
    /// First stage that is unlocked and not yet completed.
    pub fn next_stage(&self) -> Option<&TestPathStage> {
        self.stages.iter().find(|s| !s.locked && !s.completed)
    }
}
