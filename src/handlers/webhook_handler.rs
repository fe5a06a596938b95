use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    models::dto::{request::InboundMessage, response::{HealthResponse, WebhookAck}},
};

/// Inbound webhook. Always acknowledges with 200: conversational errors go
/// back as reply text, infrastructure errors are logged and the participant
/// simply gets no reply for that turn.
#[post("/webhook")]
pub async fn inbound_message(
    state: web::Data<AppState>,
    payload: web::Json<InboundMessage>,
) -> HttpResponse {
    let message = payload.into_inner();

    if let Err(err) = state
        .conversation_service
        .handle_message(&message.sender_id, &message.text)
        .await
    {
        log::error!(
            "failed to process message from '{}': {}",
            message.sender_id,
            err
        );
    }

    HttpResponse::Ok().json(WebhookAck::ok())
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => HttpResponse::Ok().json(HealthResponse { status: "ok" }),
            Err(err) => {
                log::error!("health check failed: {}", err);
                HttpResponse::ServiceUnavailable().json(HealthResponse { status: "unhealthy" })
            }
        },
        // Running on the in-memory fallback store.
        None => HttpResponse::Ok().json(HealthResponse { status: "degraded" }),
    }
}
