use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Answer;

/// Analytics record for a single graded answer. Logged fire-and-forget,
/// independently of the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub attempt_id: String,
    pub user_id: String,
    pub question_id: String,
    pub section: String,
    pub selected: i16,
    pub correct: i16,
    pub is_correct: bool,
    pub latency_ms: i64,
}

impl Attempt {
    pub fn from_answer(user_id: &str, answer: &Answer) -> Self {
        Self {
            attempt_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: answer.question_id.clone(),
            section: answer.section.clone(),
            selected: answer.selected_index,
            correct: answer.correct_index,
            is_correct: answer.is_correct,
            latency_ms: answer.latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_carries_grading_fields_from_answer() {
        let answer = Answer {
            question_id: "q7".to_string(),
            section: "Logic".to_string(),
            selected_index: 3,
            correct_index: 2,
            is_correct: false,
            latency_ms: 4200,
        };

        let attempt = Attempt::from_answer("user-1", &answer);
        assert_eq!(attempt.user_id, "user-1");
        assert_eq!(attempt.question_id, "q7");
        assert_eq!(attempt.selected, 3);
        assert_eq!(attempt.correct, 2);
        assert!(!attempt.is_correct);
        assert_eq!(attempt.latency_ms, 4200);
        assert!(!attempt.attempt_id.is_empty());
    }
}
