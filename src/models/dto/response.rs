use serde::Serialize;

/// Webhook acknowledgment. Always 200; conversational errors travel as reply
/// text, never as status codes.
#[derive(Clone, Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
