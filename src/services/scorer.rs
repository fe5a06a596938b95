use crate::models::domain::{Answer, Question};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    pub total_correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub feedback_lines: Vec<String>,
}

/// Computes the final score for a completed run. Pure function of its inputs;
/// `questions` is only consulted to resolve rationales for feedback.
///
/// Each section with at least one incorrect answer contributes one feedback
/// line built from the first incorrect question's rationale, in section
/// order. Sections answered fully correctly, never answered, or whose
/// incorrect question lacks a rationale contribute nothing.
pub fn score(
    answers: &[Answer],
    sections_in_order: &[&str],
    questions: &[Question],
) -> ScoreReport {
    let mut total = 0;
    let mut total_correct = 0;
    let mut feedback_lines = Vec::new();

    for section in sections_in_order {
        let section_answers: Vec<&Answer> =
            answers.iter().filter(|a| a.section == *section).collect();
        if section_answers.is_empty() {
            continue;
        }

        total += section_answers.len();
        total_correct += section_answers.iter().filter(|a| a.is_correct).count();

        if let Some(first_wrong) = section_answers.iter().find(|a| !a.is_correct) {
            let rationale = questions
                .iter()
                .find(|q| q.id == first_wrong.question_id)
                .and_then(|q| q.rationale.as_deref())
                .filter(|r| !r.is_empty());
            if let Some(rationale) = rationale {
                feedback_lines.push(format!("{}: {}", section, rationale));
            }
        }
    }

    let percentage = if total == 0 {
        0
    } else {
        (100.0 * total_correct as f64 / total as f64).round() as u32
    };

    ScoreReport {
        total_correct,
        total,
        percentage,
        feedback_lines,
    }
}
