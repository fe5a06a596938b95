#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Answer, Question};

    /// Creates a well-formed question with the given options and 1-based
    /// correct index.
    pub fn test_question(id: &str, section: &str, options: &[&str], correct: i16) -> Question {
        Question {
            id: id.to_string(),
            section: section.to_string(),
            stem: format!("Stem for {}", id),
            passage: None,
            rationale: None,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
            difficulty: None,
        }
    }

    /// Creates a graded answer for scoring tests.
    pub fn test_answer(question_id: &str, section: &str, is_correct: bool) -> Answer {
        Answer {
            question_id: question_id.to_string(),
            section: section.to_string(),
            selected_index: if is_correct { 1 } else { 2 },
            correct_index: 1,
            is_correct,
            latency_ms: 1500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_question() {
        let question = test_question("q1", "Grammar", &["a", "b"], 2);
        assert_eq!(question.id, "q1");
        assert_eq!(question.options.len(), 2);
        assert!(question.is_well_formed());
    }

    #[test]
    fn test_fixtures_test_answer() {
        let answer = test_answer("q1", "Reading", false);
        assert_eq!(answer.section, "Reading");
        assert!(!answer.is_correct);
        assert_ne!(answer.selected_index, answer.correct_index);
    }
}
