//! Panel error taxonomy
//!
//! Every failure reaching the orchestrator is classified as transient
//! (retryable: rate limit, server error, network failure) or fatal
//! (non-retryable: bad request, invalid credential, validation failure).
//! Nothing in this crate terminates the hosting process; every error path
//! returns control to the idle state.

use crate::host::HostError;
use crate::services::generation_client::GenError;
use thiserror::Error;

/// Result type for panel operations
pub type PanelResult<T> = std::result::Result<T, PanelError>;

/// Classified panel error, translated into user-visible status text by the
/// orchestrator
#[derive(Debug, Error)]
pub enum PanelError {
    /// Retryable failure: rate limit, server error, network failure
    #[error("Temporary failure, try again: {0}")]
    Transient(String),

    /// Non-retryable failure: bad request, invalid credential, validation
    #[error("{0}")]
    Fatal(String),

    /// A previously listed asset has vanished from the catalog
    #[error("Asset not found: {0}")]
    NotFound(String),
}

impl From<GenError> for PanelError {
    fn from(err: GenError) -> Self {
        match err {
            GenError::Transient(msg) => PanelError::Transient(msg),
            GenError::Fatal(msg) => PanelError::Fatal(msg),
        }
    }
}

impl From<HostError> for PanelError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Communication(msg) => {
                PanelError::Transient(format!("Host bridge unavailable: {msg}"))
            }
            HostError::Rejected(msg) => PanelError::Fatal(format!("Host rejected request: {msg}")),
        }
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Fatal(format!("File write failed: {err}"))
    }
}
