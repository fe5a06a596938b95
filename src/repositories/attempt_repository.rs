use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Attempt};

/// Sink for graded-answer analytics. Only ever invoked fire-and-forget: a
/// failure here must never block or fail the conversation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRecorder: Send + Sync {
    async fn record(&self, attempt: Attempt) -> AppResult<()>;
}

pub struct MongoAttemptRecorder {
    collection: Collection<Attempt>,
}

impl MongoAttemptRecorder {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_id_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_index).await?;

        log::info!("Successfully created indexes for attempts collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptRecorder for MongoAttemptRecorder {
    async fn record(&self, attempt: Attempt) -> AppResult<()> {
        self.collection.insert_one(&attempt).await?;
        Ok(())
    }
}

/// Fallback recorder for when no database is available: attempts only show up
/// in the application log.
pub struct LogAttemptRecorder;

#[async_trait]
impl AttemptRecorder for LogAttemptRecorder {
    async fn record(&self, attempt: Attempt) -> AppResult<()> {
        log::info!(
            "attempt {}: user={} question={} section={} selected={} correct={} latency_ms={}",
            attempt.attempt_id,
            attempt.user_id,
            attempt.question_id,
            attempt.section,
            attempt.selected,
            attempt.is_correct,
            attempt.latency_ms
        );
        Ok(())
    }
}
