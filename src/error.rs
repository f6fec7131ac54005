//! Error taxonomy shared by the knowledge base and the alpha vault.
//!
//! Only hard failures live here. A submission that misses a threshold, lacks a
//! metric, or reuses a name is *not* an error: it comes back as a
//! [`FailureReason`](crate::vault::validate::FailureReason) inside a successful
//! [`SubmitOutcome`](crate::vault::store::SubmitOutcome).

use std::path::PathBuf;

/// Convenience alias used throughout the core components.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The search query is empty after tokenization, or its arguments are out of range.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The configured research-papers directory does not exist.
    #[error("research directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Caller input that cannot be turned into a typed submission.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The SQLite store rejected or failed an operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// A metrics or parameters blob could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// `true` for mistakes the caller can fix by changing its input;
    /// `false` when the tool itself is broken (missing directory, storage down).
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::MalformedInput(_))
    }

    /// Stable snake_case tag for the variant, used in tool error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "invalid_query",
            Self::DirectoryNotFound(_) => "directory_not_found",
            Self::MalformedInput(_) => "malformed_input",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Serialization(_) => "serialization",
        }
    }
}
