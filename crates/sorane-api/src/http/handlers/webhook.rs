//! Webhook receiver handler.
//!
//! The platform mandates a fast acknowledgment, so the handler spawns the
//! parse-and-dispatch work onto a detached task and returns `200`
//! immediately and unconditionally, before that task completes.
//! Everything that can fail fails inside the worker, where it is logged
//! and dropped -- the acknowledgment has already been sent, so there is
//! nobody left to surface an error to.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use sorane_types::error::DispatchError;
use sorane_types::event::{InboundMessage, ReplyToken, UserId};

use crate::state::AppState;

/// POST /webhook - receive a platform event envelope.
pub async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<serde_json::Value> {
    let request_id = Uuid::now_v7().to_string();

    tokio::spawn(async move {
        if let Err(error) = dispatch(state, &body).await {
            tracing::warn!(request_id = %request_id, error = %error, "webhook dispatch failed");
        }
    });

    Json(serde_json::json!({ "status": "ok" }))
}

/// Parse the envelope and run the orchestrator for each text event.
async fn dispatch(state: AppState, body: &[u8]) -> Result<(), DispatchError> {
    for message in parse_events(body)? {
        state.orchestrator.handle(message).await;
    }
    Ok(())
}

/// Reduce the raw body to the text-message events it carries.
///
/// Non-text events (stickers, follows, ...) are out of scope and silently
/// skipped; only an unparsable envelope is an error.
fn parse_events(body: &[u8]) -> Result<Vec<InboundMessage>, DispatchError> {
    let envelope: WebhookEnvelope = serde_json::from_slice(body)
        .map_err(|e| DispatchError::InvalidEnvelope(e.to_string()))?;

    Ok(envelope
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_inbound)
        .collect())
}

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "replyToken")]
    reply_token: Option<String>,
    source: Option<EventSource>,
    message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
struct EventSource {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl WebhookEvent {
    /// Reduce one platform event to an [`InboundMessage`], or `None` for
    /// anything that is not a complete text-message event.
    fn into_inbound(self) -> Option<InboundMessage> {
        if self.kind != "message" {
            return None;
        }
        let message = self.message?;
        if message.kind != "text" {
            return None;
        }
        Some(InboundMessage {
            user_id: UserId::from(self.source?.user_id?),
            text: message.text?,
            reply_token: ReplyToken::new(self.reply_token?),
        })
    }
}
