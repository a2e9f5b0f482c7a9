//! Environment variable secret loading.
//!
//! Secrets (the backend API token, the messaging channel token) are
//! supplied through the environment and wrapped in [`SecretString`]
//! immediately, so they never appear in `Debug` output or tracing logs.
//! There is no writable secret backend: users set env vars via their
//! shell or deployment config, not through this process.

use secrecy::SecretString;

/// Read a secret from the environment.
///
/// Returns `None` when the variable is unset, empty after trimming, or
/// not valid Unicode -- a present-but-unusable value is treated the same
/// as an absent one.
pub fn secret_from_env(name: &str) -> Option<SecretString> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}
