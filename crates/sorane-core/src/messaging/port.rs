//! MessagePort trait definition.
//!
//! The two outbound channels the delivery scheduler depends on: the
//! single-use synchronous reply channel bound to an inbound event, and the
//! multi-use asynchronous push channel keyed by user identity.
//! Implementations live in sorane-infra (e.g., `LineMessagePort`).

use sorane_types::error::DeliveryError;
use sorane_types::event::{ReplyToken, UserId};

/// Trait for messaging platform send capabilities.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Not
/// object-safe; use [`super::BoxMessagePort`] for dynamic dispatch.
pub trait MessagePort: Send + Sync {
    /// Human-readable platform name (e.g., "line").
    fn name(&self) -> &str;

    /// Send `text` through the reply channel bound to one inbound event.
    ///
    /// The token is single-use on the platform side; callers must not
    /// invoke this more than once per token.
    fn reply(
        &self,
        token: &ReplyToken,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;

    /// Send `text` to a user out-of-band, independent of any reply token.
    fn push(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}
