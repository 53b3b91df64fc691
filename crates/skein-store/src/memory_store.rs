//! In-memory blob store backend.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use skein_types::{Commitment, Namespace};
use tracing::debug;

use crate::error::StoreError;
use crate::traits::{BlobStore, Submitted};

type BlobKey = (u64, Namespace, Commitment);

/// In-memory blob store backed by a `RwLock<HashMap>`.
///
/// Each submit commits at a fresh height. Commitments are
/// `blake3(namespace || data)`. Useful for tests and for running the
/// protocol without a node.
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobKey, Bytes>>,
    next_height: AtomicU64,
    max_blob_size: usize,
}

impl MemoryBlobStore {
    /// Create a new in-memory store that rejects blobs above `max_blob_size`.
    pub fn new(max_blob_size: usize) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            next_height: AtomicU64::new(1),
            max_blob_size,
        }
    }

    /// Start assigning heights from `height` instead of 1.
    pub fn starting_at(self, height: u64) -> Self {
        self.next_height.store(height.max(1), Ordering::SeqCst);
        self
    }

    /// Commitment this store assigns to `data` under `namespace`.
    pub fn commitment_for(namespace: &Namespace, data: &[u8]) -> Commitment {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&namespace.to_bytes());
        hasher.update(data);
        Commitment::from(*hasher.finalize().as_bytes())
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every blob committed below `height`, as a pruning node would.
    ///
    /// Returns the number of blobs removed.
    pub fn prune_below(&self, height: u64) -> usize {
        let mut map = self.blobs.write().expect("lock poisoned");
        let before = map.len();
        map.retain(|(h, _, _), _| *h >= height);
        let removed = before - map.len();
        debug!(height, removed, "pruned blobs");
        removed
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn submit(&self, namespace: &Namespace, data: Bytes) -> Result<Submitted, StoreError> {
        if data.len() > self.max_blob_size {
            return Err(StoreError::TooLarge {
                size: data.len(),
                max: self.max_blob_size,
            });
        }

        let commitment = Self::commitment_for(namespace, &data);
        let height = self.next_height.fetch_add(1, Ordering::SeqCst);

        debug!(height, %namespace, %commitment, size = data.len(), "storing blob in memory");
        let mut map = self.blobs.write().expect("lock poisoned");
        map.insert((height, *namespace, commitment.clone()), data);

        Ok(Submitted { commitment, height })
    }

    async fn get(
        &self,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> Result<Bytes, StoreError> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(&(height, *namespace, commitment.clone()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                height,
                namespace: *namespace,
                commitment: commitment.clone(),
            })
    }
}
