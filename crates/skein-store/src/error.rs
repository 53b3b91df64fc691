//! Error types for blob store operations.

use skein_types::{Commitment, Namespace};

/// Errors that can occur while submitting or fetching blobs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob exists at the given coordinates (pruned, wrong namespace or commitment).
    #[error("blob not found: height={height}, namespace={namespace}, commitment={commitment}")]
    NotFound {
        /// Requested height.
        height: u64,
        /// Requested namespace.
        namespace: Namespace,
        /// Requested commitment.
        commitment: Commitment,
    },

    /// The blob exceeds the store's size limit.
    #[error("blob too large: {size} bytes, store accepts at most {max}")]
    TooLarge {
        /// Size of the rejected blob.
        size: usize,
        /// Store limit.
        max: usize,
    },

    /// The store refused the blob or request.
    #[error("store rejected request: {0}")]
    Rejected(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the node.
        message: String,
    },

    /// The HTTP request to the node failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node's response could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The submitted blob was not found at the height the node reported.
    #[error("submitted blob not found at height {0}, cannot resolve its commitment")]
    CommitmentUnresolved(u64),

    /// A submit was answered with height 0, meaning nothing was committed.
    #[error("store reported height 0")]
    ZeroHeight,

    /// The call did not complete within the configured timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(std::time::Duration),
}
