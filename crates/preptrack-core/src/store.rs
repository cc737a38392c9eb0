//! Client-side state containers for an exam session.
//!
//! `ExamDataStore` holds the exam page currently on screen and
//! `AttemptBuffer` holds the answers recorded so far. Both are plain structs
//! owned by the session that uses them.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SessionError;
use crate::model::{Attempt, Exam};

/// Answers recorded during a session, keyed by question id.
///
/// Writing an attempt for a question that already has one replaces it in
/// place (last write wins); the position of the first write is kept, so
/// iteration follows the order questions were first answered.
#[derive(Debug, Clone, Default)]
pub struct AttemptBuffer {
    entries: Vec<Attempt>,
    index: HashMap<String, usize>,
    capacity: Option<usize>,
}

impl AttemptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that refuses more than `capacity` distinct questions.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Set the distinct-question limit, normally the exam's total question count.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = Some(capacity);
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Insert or replace the attempt for `attempt.question_id`.
    ///
    /// Returns the replaced attempt, if any. A new question id is refused
    /// once the buffer holds `capacity` entries.
    pub fn add_response(&mut self, attempt: Attempt) -> Result<Option<Attempt>, SessionError> {
        if let Some(&pos) = self.index.get(&attempt.question_id) {
            let previous = std::mem::replace(&mut self.entries[pos], attempt);
            debug!(question_id = %previous.question_id, "replaced attempt");
            return Ok(Some(previous));
        }

        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity {
                return Err(SessionError::BufferFull { capacity });
            }
        }

        self.index
            .insert(attempt.question_id.clone(), self.entries.len());
        self.entries.push(attempt);
        Ok(None)
    }

    /// Remove every recorded attempt. The capacity limit is kept.
    pub fn reset_responses(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn get(&self, question_id: &str) -> Option<&Attempt> {
        self.index.get(question_id).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.entries.iter()
    }

    /// Snapshot of all attempts in first-answered order.
    pub fn to_vec(&self) -> Vec<Attempt> {
        self.entries.clone()
    }
}

/// Handle for one in-flight page load.
///
/// Only the most recently issued ticket may write to the store; results
/// carried by older tickets are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub exam_id: String,
    pub page: u32,
}

/// The exam page currently loaded, plus a loading flag.
#[derive(Debug, Clone, Default)]
pub struct ExamDataStore {
    exam: Option<Exam>,
    loading: bool,
    generation: u64,
}

impl ExamDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exam(&self) -> Option<&Exam> {
        self.exam.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the store currently holds data for `exam_id`.
    pub fn holds(&self, exam_id: &str) -> bool {
        self.exam.as_ref().is_some_and(|e| e.id == exam_id)
    }

    /// Start a load, invalidating every ticket issued before it.
    pub fn begin_load(&mut self, exam_id: &str, page: u32) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
            exam_id: exam_id.to_string(),
            page,
        }
    }

    /// Apply a fetched page. Returns `false` if the ticket is stale.
    pub fn complete_load(&mut self, ticket: &LoadTicket, exam: Exam) -> bool {
        if !self.is_current(ticket) {
            debug!(
                exam_id = %ticket.exam_id,
                page = ticket.page,
                "discarding stale exam page"
            );
            return false;
        }
        self.exam = Some(exam);
        self.loading = false;
        true
    }

    /// Mark a load as failed. Stale tickets leave the flag alone.
    pub fn fail_load(&mut self, ticket: &LoadTicket) {
        if self.is_current(ticket) {
            self.loading = false;
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Drop the loaded exam and invalidate outstanding tickets.
    pub fn clear(&mut self) {
        self.exam = None;
        self.loading = false;
        self.generation += 1;
    }
}
