use crate::models::domain::Question;
use crate::services::scorer::ScoreReport;

pub const START_ACK: &str =
    "Welcome to the placement test! You will get one question per section. \
Reply with the number of your answer. Send any message to receive your first question.";

pub const IDLE_HINT: &str = "Send \"start\" to begin the placement test.";

pub fn validation_prompt(option_count: usize) -> String {
    format!(
        "That doesn't look like a valid answer. Please reply with a number from 1 to {}.",
        option_count
    )
}

pub fn skip_notice(section: &str) -> String {
    format!(
        "No questions are available for the {} section right now, skipping it. Send any message to continue.",
        section
    )
}

pub fn format_question(question: &Question, position: usize, section_count: usize) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{} — section {}/{}]",
        question.section, position, section_count
    ));
    if let Some(passage) = question.passage.as_deref().filter(|p| !p.is_empty()) {
        lines.push(passage.to_string());
        lines.push(String::new());
    }
    lines.push(question.stem.clone());
    for (i, option) in question.options.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, option));
    }
    lines.push(format!(
        "Reply with a number from 1 to {}.",
        question.options.len()
    ));
    lines.join("\n")
}

pub fn format_result(report: &ScoreReport) -> String {
    let mut text = format!(
        "Test complete! You scored {}/{} ({}%).",
        report.total_correct, report.total, report.percentage
    );
    if !report.feedback_lines.is_empty() {
        text.push_str("\n\nAreas to review:");
        for line in &report.feedback_lines {
            text.push('\n');
            text.push_str(line);
        }
    }
    text.push_str("\n\nSend \"start\" to take the test again.");
    text
}
