//! HTTP layer for Sorane.
//!
//! A deliberately small surface: the platform webhook receiver and a
//! health endpoint. Webhook signature verification is handled upstream
//! (platform SDK or gateway), not here.

pub mod handlers;
pub mod router;
