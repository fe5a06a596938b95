use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;
use mongodb::{
    bson::{doc, DateTime},
    options::IndexOptions,
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{db::Database, errors::AppResult, models::domain::Session};

/// Keyed session storage with per-entry expiry. Both backends must behave
/// identically from the outside: a set followed by a get within the TTL
/// window returns an equivalent session, a get after the TTL elapses
/// returns absent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Session>>;
    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> AppResult<()>;
}

#[derive(Debug, Deserialize, Serialize)]
struct SessionRecord {
    sender_id: String,
    session: Session,
    expires_at: DateTime,
}

pub struct MongoSessionStore {
    collection: Collection<SessionRecord>,
}

impl MongoSessionStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for sessions collection");

        let sender_index = IndexModel::builder()
            .keys(doc! { "sender_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("sender_id_unique".to_string())
                    .build(),
            )
            .build();

        let ttl_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .name("expires_at_ttl".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(sender_index).await?;
        self.collection.create_index(ttl_index).await?;

        log::info!("Successfully created indexes for sessions collection");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn get(&self, key: &str) -> AppResult<Option<Session>> {
        // The server-side TTL sweep runs on a coarse interval, so filter on
        // expires_at here as well to keep expiry exact.
        let record = self
            .collection
            .find_one(doc! {
                "sender_id": key,
                "expires_at": { "$gt": DateTime::now() }
            })
            .await?;
        Ok(record.map(|r| r.session))
    }

    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> AppResult<()> {
        let record = SessionRecord {
            sender_id: key.to_string(),
            session: session.clone(),
            expires_at: DateTime::from_system_time(SystemTime::now() + ttl),
        };
        self.collection
            .replace_one(doc! { "sender_id": key }, &record)
            .upsert(true)
            .await?;
        Ok(())
    }
}

/// Process-local substitute for the Mongo store. Not durable, not shared
/// across instances; entries past expiry are evicted lazily on read.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, (Session, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> AppResult<Option<Session>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((session, expires_at)) if *expires_at > Instant::now() => {
                    return Ok(Some(session.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry exists but is past its expiry: evict it.
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (session.clone(), Instant::now() + ttl));
        Ok(())
    }
}
