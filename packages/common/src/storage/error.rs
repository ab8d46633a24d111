use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No blob exists for the benchmark id.
    #[error("benchmark data not found: {0}")]
    NotFound(i32),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob exists but could not be decompressed or decoded.
    #[error("corrupt benchmark data for {id}: {reason}")]
    Corrupt { id: i32, reason: String },

    /// The run list could not be encoded.
    #[error("failed to encode benchmark data: {0}")]
    Encode(String),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}
