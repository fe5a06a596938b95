use async_trait::async_trait;
use serde::Deserialize;

use crate::{config::Config, errors::AppResult, models::domain::Question};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Returns the full question set. Called once per inbound message; no
    /// caching across messages is assumed by the core.
    async fn fetch_all(&self) -> AppResult<Vec<Question>>;
}

/// Question source backed by a published sheet export: a JSON document of the
/// form `{"values": [[...], ...]}` where the first row is a header.
///
/// Expected columns:
/// `id | section | stem | passage | options ("|"-separated) | correct (1-based) | rationale | difficulty`
pub struct HttpQuestionRepository {
    client: reqwest::Client,
    source_url: String,
}

#[derive(Debug, Deserialize)]
struct SheetPayload {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl HttpQuestionRepository {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            source_url: config.question_source_url.clone(),
        }
    }
}

#[async_trait]
impl QuestionRepository for HttpQuestionRepository {
    async fn fetch_all(&self) -> AppResult<Vec<Question>> {
        let payload: SheetPayload = self
            .client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut questions = Vec::new();
        for (row_number, row) in payload.values.iter().enumerate().skip(1) {
            match parse_row(row) {
                Some(question) => questions.push(question),
                None => log::warn!("skipping malformed question row {}", row_number + 1),
            }
        }

        log::debug!("fetched {} questions from source", questions.len());
        Ok(questions)
    }
}

fn parse_row(row: &[String]) -> Option<Question> {
    if row.len() < 6 {
        return None;
    }

    let options: Vec<String> = row[4]
        .split('|')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    let correct: i16 = row[5].trim().parse().ok()?;

    let question = Question {
        id: row[0].trim().to_string(),
        section: row[1].trim().to_string(),
        stem: row[2].trim().to_string(),
        passage: non_empty(row.get(3)),
        rationale: non_empty(row.get(6)),
        options,
        correct,
        difficulty: non_empty(row.get(7)),
    };

    if question.id.is_empty() || question.section.is_empty() || !question.is_well_formed() {
        return None;
    }

    Some(question)
}

fn non_empty(cell: Option<&String>) -> Option<String> {
    cell.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}
