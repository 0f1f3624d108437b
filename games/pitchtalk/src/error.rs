//! Error kinds for a single account step.
//!
//! Every API call returns one of these instead of throwing; the session
//! runner logs it and skips whatever depended on the failed step.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PitchtalkError {
    /// The credential string lacks the encoded `id` or `username` field.
    #[error("Malformed credential: no {field} found")]
    MalformedCredential { field: &'static str },

    /// Network-level failure (connect, TLS, timeout, body read).
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Non-2xx status, or a 2xx whose body does not have the expected shape.
    #[error("Unexpected response from {endpoint} (HTTP {status}): {reason}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        reason: String,
    },

    /// The proxy's public IP could not be determined.
    #[error("Error while checking proxy IP via {proxy}: {reason}")]
    ProxyResolution { proxy: String, reason: String },
}

impl PitchtalkError {
    pub fn transport(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unexpected(endpoint: impl Into<String>, status: u16, reason: impl ToString) -> Self {
        Self::UnexpectedStatus {
            endpoint: endpoint.into(),
            status,
            reason: reason.to_string(),
        }
    }
}
