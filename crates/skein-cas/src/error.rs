//! Error types for splitting and manifest encoding.

/// Errors that can occur while splitting payloads or encoding manifests.
#[derive(Debug, thiserror::Error)]
pub enum CasError {
    /// Chunk size limit must be positive.
    #[error("invalid chunk size {0}: must be greater than zero")]
    InvalidChunkSize(usize),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred during streaming.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
