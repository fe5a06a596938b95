use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionState {
    Idle,
    Asking,
    WaitingAnswer,
}

/// One graded response. Immutable once appended to a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub section: String,
    pub selected_index: i16,
    pub correct_index: i16,
    pub is_correct: bool,
    pub latency_ms: i64,
}

/// Per-participant conversational state for one placement run. Created at the
/// idle baseline on first contact (or after TTL expiry) and mutated exactly
/// once per inbound message.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub state: SessionState,
    pub section_index: usize,
    pub answers: Vec<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_started_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            section_index: 0,
            answers: Vec::new(),
            current_question: None,
            question_started_at: None,
        }
    }
}

impl Session {
    /// Question ids already answered in the given section during this run.
    pub fn asked_ids(&self, section: &str) -> std::collections::HashSet<String> {
        self.answers
            .iter()
            .filter(|a| a.section == section)
            .map(|a| a.question_id.clone())
            .collect()
    }
}
