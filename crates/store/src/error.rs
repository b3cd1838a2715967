//! Store-level error taxonomy.

use leadline_client::CrmApiError;

/// Errors surfaced to UI callers by store operations.
///
/// Cloneable with string payloads so a deduplicated failure can be
/// delivered to every caller waiting on the shared request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The network or HTTP layer failed.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend processed the request and reported failure.
    #[error("Rejected by server: {0}")]
    Rejected(String),
}

impl From<CrmApiError> for StoreError {
    fn from(err: CrmApiError) -> Self {
        match err {
            CrmApiError::Request(e) => StoreError::Transport(e.to_string()),
            CrmApiError::Api { status, body } => {
                StoreError::Transport(format!("HTTP {status}: {body}"))
            }
            CrmApiError::Rejected(message) => StoreError::Rejected(message),
        }
    }
}
