use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{config::Config, errors::AppResult};

/// Outbound message channel. Delivery is best-effort: failures are logged by
/// the caller, never retried or surfaced to the participant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, to: &str, text: &str) -> AppResult<()>;
}

/// Messenger backed by an HTTP messaging gateway.
pub struct HttpMessenger {
    client: reqwest::Client,
    gateway_url: String,
    token: SecretString,
}

impl HttpMessenger {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url: config.outbound_gateway_url.clone(),
            token: config.outbound_token.clone(),
        }
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    async fn send(&self, to: &str, text: &str) -> AppResult<()> {
        self.client
            .post(&self.gateway_url)
            .bearer_auth(self.token.expose_secret())
            .json(&serde_json::json!({ "to": to, "text": text }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
