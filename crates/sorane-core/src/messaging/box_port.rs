//! BoxMessagePort -- object-safe dynamic dispatch wrapper for MessagePort.
//!
//! Same blanket-impl pattern as `BoxTextGenerator`: an object-safe
//! `MessagePortDyn` trait with boxed futures, a blanket impl for all
//! `T: MessagePort`, and a wrapper struct that delegates.

use std::future::Future;
use std::pin::Pin;

use sorane_types::error::DeliveryError;
use sorane_types::event::{ReplyToken, UserId};

use super::port::MessagePort;

/// Object-safe version of [`MessagePort`] with boxed futures.
pub trait MessagePortDyn: Send + Sync {
    fn name(&self) -> &str;

    fn reply_boxed<'a>(
        &'a self,
        token: &'a ReplyToken,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;

    fn push_boxed<'a>(
        &'a self,
        user_id: &'a UserId,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;
}

impl<T: MessagePort> MessagePortDyn for T {
    fn name(&self) -> &str {
        MessagePort::name(self)
    }

    fn reply_boxed<'a>(
        &'a self,
        token: &'a ReplyToken,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(self.reply(token, text))
    }

    fn push_boxed<'a>(
        &'a self,
        user_id: &'a UserId,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(self.push(user_id, text))
    }
}

/// Type-erased messaging platform for runtime selection.
pub struct BoxMessagePort {
    inner: Box<dyn MessagePortDyn + Send + Sync>,
}

impl BoxMessagePort {
    /// Wrap a concrete `MessagePort` in a type-erased box.
    pub fn new<T: MessagePort + 'static>(port: T) -> Self {
        Self {
            inner: Box::new(port),
        }
    }

    /// Human-readable platform name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send `text` through the single-use reply channel.
    pub async fn reply(&self, token: &ReplyToken, text: &str) -> Result<(), DeliveryError> {
        self.inner.reply_boxed(token, text).await
    }

    /// Send `text` to a user through the push channel.
    pub async fn push(&self, user_id: &UserId, text: &str) -> Result<(), DeliveryError> {
        self.inner.push_boxed(user_id, text).await
    }
}
