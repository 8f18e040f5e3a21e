//! Error types for the reconciliation engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while validating or reconciling records.
///
/// `InvalidName` and `Serialization` are input defects and are always raised
/// before any remote call. `RemoteList` and `RemoteWrite` carry the remote
/// response verbatim and are never retried by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Record name does not match the allowed key grammar.
    #[error("invalid record name: {name:?}")]
    InvalidName { name: String },

    /// Record value could not be serialized to JSON.
    #[error("failed to serialize record {name}: {source}")]
    Serialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Listing remote keys failed. `status` is `None` when no HTTP response
    /// was received.
    #[error("remote key listing failed{}: {body}", fmt_status(.status))]
    RemoteList { status: Option<u16>, body: String },

    /// Bulk mutation failed. `committed` counts records in chunks that were
    /// accepted before the failing one.
    #[error("remote bulk write failed{} after {committed} committed records: {body}", fmt_status(.status))]
    RemoteWrite {
        status: Option<u16>,
        body: String,
        committed: usize,
    },

    /// Invalid store configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl EngineError {
    /// Returns true for caller input defects, which are fixed by correcting
    /// the input rather than by retrying.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::Serialization { .. })
    }

    /// HTTP status of the failed remote response, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteList { status, .. } | Self::RemoteWrite { status, .. } => *status,
            _ => None,
        }
    }
}
