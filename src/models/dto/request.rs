use serde::Deserialize;

/// The only fields the core needs out of an inbound webhook delivery.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub sender_id: String,
    pub text: String,
}
