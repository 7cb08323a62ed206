//! Error taxonomy for the cashier terminal.
//!
//! Every fallible operation resolves into one of four buckets: `Auth`
//! (invalid credentials, expired token), `Validation` (bad cashier input,
//! blocked before any state changes), `Network` (transport failures),
//! and `Api` (non-2xx backend responses with their `detail` message).
//! Nothing here is fatal to the process; callers return the UI to a
//! stable state and show the message.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PosError {
    /// Login rejected or bearer token no longer accepted by the backend.
    #[error("{0}")]
    Auth(String),

    /// Cashier input rejected before anything was sent to the backend.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure: connection refused, DNS, malformed body.
    #[error("{0}")]
    Network(String),

    /// Backend answered with a non-success status and (usually) a detail.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// Durable credential store failure (OS keyring).
    #[error("{0}")]
    Storage(String),

    /// Host print facility failure.
    #[error("{0}")]
    Print(String),
}

impl PosError {
    /// True when the error means the current credential is no longer valid
    /// and the session should fall back to unauthenticated.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, PosError::Auth(_))
    }

    /// The human-readable message to surface to the cashier.
    pub fn detail(&self) -> &str {
        match self {
            PosError::Auth(msg)
            | PosError::Validation(msg)
            | PosError::Network(msg)
            | PosError::Storage(msg)
            | PosError::Print(msg) => msg,
            PosError::Api { detail, .. } => detail,
        }
    }
}
