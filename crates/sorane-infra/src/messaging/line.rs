//! LineMessagePort -- concrete [`MessagePort`] for the LINE Messaging API.
//!
//! `reply` posts to `/v2/bot/message/reply` with the event's single-use
//! reply token; `push` posts to `/v2/bot/message/push` keyed by user id.
//! Both send one text message per call, matching the paced-delivery model
//! of one chunk per send.
//!
//! The channel access token is wrapped in [`secrecy::SecretString`] and
//! is never logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use sorane_core::messaging::MessagePort;
use sorane_types::error::DeliveryError;
use sorane_types::event::{ReplyToken, UserId};

const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// LINE Messaging API send channels.
pub struct LineMessagePort {
    client: reqwest::Client,
    channel_token: SecretString,
    base_url: String,
}

impl LineMessagePort {
    /// Create a new port with the channel access token.
    pub fn new(channel_token: SecretString, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            channel_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(self.channel_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn text_message(text: &str) -> serde_json::Value {
    serde_json::json!({ "type": "text", "text": text })
}

fn reply_body(token: &ReplyToken, text: &str) -> serde_json::Value {
    serde_json::json!({
        "replyToken": token.as_str(),
        "messages": [text_message(text)],
    })
}

fn push_body(user_id: &UserId, text: &str) -> serde_json::Value {
    serde_json::json!({
        "to": user_id.as_str(),
        "messages": [text_message(text)],
    })
}

impl MessagePort for LineMessagePort {
    fn name(&self) -> &str {
        "line"
    }

    async fn reply(&self, token: &ReplyToken, text: &str) -> Result<(), DeliveryError> {
        self.post("/v2/bot/message/reply", reply_body(token, text))
            .await
    }

    async fn push(&self, user_id: &UserId, text: &str) -> Result<(), DeliveryError> {
        self.post("/v2/bot/message/push", push_body(user_id, text))
            .await
    }
}
