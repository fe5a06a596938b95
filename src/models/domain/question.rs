use serde::{Deserialize, Serialize};

/// One multiple-choice question as delivered by the question source.
/// `correct` is a 1-based index into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub section: String,
    pub stem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub options: Vec<String>,
    pub correct: i16,
    pub difficulty: Option<String>,
}

impl Question {
    /// A question is usable only if `correct` addresses one of its options.
    pub fn is_well_formed(&self) -> bool {
        !self.options.is_empty()
            && self.correct >= 1
            && (self.correct as usize) <= self.options.len()
    }
}
