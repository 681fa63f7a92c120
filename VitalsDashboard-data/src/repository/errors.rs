use std::sync::PoisonError;
use thiserror::Error;

/// Error type for backend operations.
///
/// `Unreachable` means no response arrived at all (connect failure, timeout).
/// Every other variant means the backend answered but the exchange failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No response was received
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// A response arrived with a non-success status
    #[error("Backend error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Backend `detail` text, or `HTTP <code>: <reason>`
        message: String,
    },

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response arrived but its body was not the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The operation is not offered by the active data source
    #[error("Not available: {0}")]
    Unsupported(String),

    /// The HTTP client could not be constructed
    #[error("Client configuration error: {0}")]
    Configuration(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl ClientError {
    /// Whether the failure happened before any response was received
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable(_))
    }

    /// Whether the active data source simply does not offer the operation
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ClientError::Unsupported(_))
    }
}

impl<T> From<PoisonError<T>> for ClientError {
    fn from(error: PoisonError<T>) -> Self {
        ClientError::Lock(error.to_string())
    }
}
