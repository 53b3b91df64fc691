//! Error types for the engine.

use skein_store::StoreError;
use skein_types::TypesError;

/// Errors that can occur during submit or read.
///
/// Store failures carry the chunk index or locator they happened at. No
/// variant is retried; chunks committed before a failure stay in the store.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid client configuration, detected before any store call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Splitting or manifest encoding failed.
    #[error("cas error: {0}")]
    Cas(#[from] skein_cas::CasError),

    /// A zero-length payload produces no chunks and so has no root locator.
    #[error("payload is empty, nothing to submit")]
    EmptyPayload,

    /// Committing a data chunk failed.
    #[error("submitting chunk {index} of {total} failed: {source}")]
    ChunkSubmit {
        /// Zero-based chunk index.
        index: usize,
        /// Number of chunks in the payload.
        total: usize,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Committing the manifest blob failed after all chunks were stored.
    #[error("submitting manifest failed: {0}")]
    ManifestSubmit(#[source] StoreError),

    /// Fetching the root blob failed.
    #[error("fetching root {locator} failed: {source}")]
    RootFetch {
        /// The root locator string.
        locator: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// A manifest entry holds a malformed locator.
    #[error("manifest entry {index} is malformed: {source}")]
    InvalidEntry {
        /// Zero-based entry index.
        index: usize,
        /// Decoding failure.
        #[source]
        source: TypesError,
    },

    /// Fetching a chunk referenced by the manifest failed.
    #[error("fetching chunk {index} ({locator}) failed: {source}")]
    ChunkFetch {
        /// Zero-based entry index.
        index: usize,
        /// The entry's locator string.
        locator: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Fetched bytes disagree with a size declared in the manifest.
    #[error("size mismatch for {what}: manifest declares {declared} bytes, got {actual}")]
    SizeMismatch {
        /// What was measured (`chunk 3`, `payload`).
        what: String,
        /// Size declared in the manifest.
        declared: u64,
        /// Size actually fetched.
        actual: u64,
    },
}
