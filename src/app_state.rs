use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRecorder, HttpQuestionRepository, InMemorySessionStore, LogAttemptRecorder,
        MongoAttemptRecorder, MongoSessionStore, SessionStore,
    },
    services::{ConversationService, HttpMessenger},
};

#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConversationService>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let questions = Arc::new(HttpQuestionRepository::new(&config));
        let messenger = Arc::new(HttpMessenger::new(&config));

        let (db, sessions, attempts): (
            Option<Database>,
            Arc<dyn SessionStore>,
            Arc<dyn AttemptRecorder>,
        ) = match Database::connect(&config).await {
            Ok(db) => {
                let sessions = Arc::new(MongoSessionStore::new(&db));
                sessions.ensure_indexes().await?;
                let attempts = Arc::new(MongoAttemptRecorder::new(&db));
                attempts.ensure_indexes().await?;
                (Some(db), sessions, attempts)
            }
            Err(err) => {
                log::warn!(
                    "MongoDB unavailable ({}); falling back to the in-memory session store. \
Sessions will not survive a restart and attempts will only be logged.",
                    err
                );
                (
                    None,
                    Arc::new(InMemorySessionStore::new()),
                    Arc::new(LogAttemptRecorder),
                )
            }
        };

        let conversation_service = Arc::new(ConversationService::new(
            sessions,
            questions,
            attempts,
            messenger,
            Duration::from_secs(config.session_ttl_secs),
        ));

        Ok(Self {
            conversation_service,
            db,
            config: Arc::new(config),
        })
    }
}
