//! Core trait and types for blob storage.

use bytes::Bytes;
use skein_types::{Commitment, Namespace};

use crate::error::StoreError;

/// Outcome of a successful submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// Commitment binding the blob's content.
    pub commitment: Commitment,
    /// Height the blob was committed at. Zero signals a failed submission.
    pub height: u64,
}

/// Trait for committing and fetching bounded-size blobs.
///
/// All implementations must be `Send + Sync` so one client can be shared
/// across tasks. Data is passed as [`Bytes`] to avoid copies between the
/// chunker and the transport.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Commit a blob under `namespace`.
    ///
    /// A returned height of zero is a failure signal distinct from `Err`;
    /// callers must check it.
    async fn submit(&self, namespace: &Namespace, data: Bytes) -> Result<Submitted, StoreError>;

    /// Fetch the blob committed at `(height, namespace, commitment)`.
    async fn get(
        &self,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> Result<Bytes, StoreError>;
}
