//! Paced multi-message delivery.
//!
//! The first chunk of a reply goes out synchronously through the one-time
//! reply channel; every later chunk is handed to an independent timer task
//! on the push channel, so a long reply arrives as a sequence of short
//! messages instead of one block.

use std::sync::Arc;
use std::time::Duration;

use sorane_types::event::{ReplyToken, UserId};

use crate::messaging::BoxMessagePort;

/// Default pacing interval between scheduled push chunks.
pub const DEFAULT_PACE: Duration = Duration::from_millis(1500);

/// Schedules delivery of segmented reply chunks.
///
/// Delivery is fire-and-forget: each chunk's failure is logged and affects
/// nothing else. Push tasks are all scheduled from the same reference
/// point with delays `pace * i`, not cumulative waits, and are not
/// cancellable once spawned. Pushes from two concurrent orchestrations for
/// the same user may interleave; that is accepted, not corrected.
pub struct DeliveryScheduler {
    port: Arc<BoxMessagePort>,
    pace: Duration,
}

impl DeliveryScheduler {
    /// Create a scheduler with the default pacing interval.
    pub fn new(port: Arc<BoxMessagePort>) -> Self {
        Self::with_pace(port, DEFAULT_PACE)
    }

    /// Create a scheduler with an explicit pacing interval.
    pub fn with_pace(port: Arc<BoxMessagePort>, pace: Duration) -> Self {
        Self { port, pace }
    }

    /// Delay before the `index`-th pushed chunk, where `index` counts from
    /// 1 for the first chunk after the synchronous reply.
    pub fn push_delay(pace: Duration, index: usize) -> Duration {
        pace * index as u32
    }

    /// Deliver `chunks` to one user: the first through the reply channel
    /// bound to `token`, the rest as independently-timed pushes.
    ///
    /// Consumes the token; the type system keeps the reply channel
    /// single-use. Returns once the reply is sent and all pushes are
    /// scheduled (not completed).
    pub async fn deliver(&self, user_id: &UserId, token: ReplyToken, chunks: Vec<String>) {
        let mut chunks = chunks.into_iter();
        let Some(first) = chunks.next() else {
            tracing::warn!(user_id = %user_id, "deliver called with no chunks; nothing sent");
            return;
        };

        if let Err(error) = self.port.reply(&token, &first).await {
            tracing::warn!(user_id = %user_id, error = %error, "reply delivery failed");
        }

        for (offset, chunk) in chunks.enumerate() {
            let delay = Self::push_delay(self.pace, offset + 1);
            let port = Arc::clone(&self.port);
            let user_id = user_id.clone();

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(error) = port.push(&user_id, &chunk).await {
                    tracing::warn!(user_id = %user_id, error = %error, "push delivery failed");
                }
            });
        }
    }
}
