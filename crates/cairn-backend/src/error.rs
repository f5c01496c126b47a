use cairn_types::TypeError;

use crate::reader::is_closed_access;

/// Errors from backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No id in the listing starts with the requested prefix.
    #[error("no ID found")]
    NotFound,

    /// More than one id in the listing starts with the requested prefix.
    #[error("multiple IDs with prefix found")]
    AmbiguousPrefix,

    /// A bounded reader was used after its resource was released.
    #[error("read from a released blob reader")]
    ClosedResourceAccess,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Failure reported by a listing provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// A name or kind could not be parsed.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl BackendError {
    /// Returns `true` for [`BackendError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` for [`BackendError::AmbiguousPrefix`].
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousPrefix)
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        // A released reader surfaces through `io::Read`; unwrap it back.
        if is_closed_access(&err) {
            return Self::ClosedResourceAccess;
        }
        Self::Io(err)
    }
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
