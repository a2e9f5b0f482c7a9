//! Delivery and dispatch error types.
//!
//! Generation errors live in [`crate::llm`]. Every failure modeled here is
//! terminal-local: logged by the component that observed it, never allowed
//! to reach the webhook acknowledgment path.

use thiserror::Error;

/// Errors from reply/push calls to the messaging platform.
///
/// Delivery is fire-and-forget: a failed chunk is logged and does not
/// affect other chunks or future turns.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("platform request failed: {0}")]
    Http(String),

    #[error("platform rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Errors from decoding the webhook body inside the detached worker.
///
/// The HTTP acknowledgment has already been returned by the time one of
/// these occurs, so it can only be logged.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid webhook envelope: {0}")]
    InvalidEnvelope(String),
}
