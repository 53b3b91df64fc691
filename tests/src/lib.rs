//! Shared test harness for Skein integration tests.
//!
//! Provides [`TestNetwork`]: one in-memory chain shared by any number of
//! clients, with a gate in front of it so tests can take the node offline
//! and bring it back. Writers and readers exchange nothing but locator
//! strings, the same way two separate processes would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use skein_engine::{ClientConfig, SkeinClient};
use skein_store::{BlobStore, MemoryBlobStore, StoreError, Submitted};
use skein_types::*;

/// Blob limit of the simulated chain.
pub const CHAIN_MAX_BLOB: usize = 2 * DEFAULT_MAX_CHUNK_SIZE;

/// Namespace used by every client the harness builds.
pub const TEST_NAMESPACE: &str = "000008e5f679bf7116cb";

// =========================================================================
// Gated store
// =========================================================================

/// Store wrapper that fails every call while the node is down.
struct GatedStore {
    inner: Arc<MemoryBlobStore>,
    down: AtomicBool,
}

impl GatedStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("node is down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for GatedStore {
    async fn submit(&self, namespace: &Namespace, data: Bytes) -> Result<Submitted, StoreError> {
        self.check()?;
        self.inner.submit(namespace, data).await
    }

    async fn get(
        &self,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> Result<Bytes, StoreError> {
        self.check()?;
        self.inner.get(height, namespace, commitment).await
    }
}

// =========================================================================
// Test network
// =========================================================================

/// A simulated node and chain that clients connect to.
pub struct TestNetwork {
    chain: Arc<MemoryBlobStore>,
    gate: Arc<GatedStore>,
}

impl TestNetwork {
    /// A fresh chain starting at height 1.
    pub fn new() -> Self {
        let chain = Arc::new(MemoryBlobStore::new(CHAIN_MAX_BLOB));
        let gate = Arc::new(GatedStore {
            inner: chain.clone(),
            down: AtomicBool::new(false),
        });
        Self { chain, gate }
    }

    /// A client with the given chunk size limit.
    pub fn client(&self, max_chunk_size: usize) -> SkeinClient {
        self.client_with(ClientConfig {
            max_chunk_size,
            ..ClientConfig::new(namespace())
        })
    }

    /// A client with an explicit configuration.
    pub fn client_with(&self, config: ClientConfig) -> SkeinClient {
        SkeinClient::new(config, self.gate.clone()).unwrap()
    }

    /// Number of blobs on the chain.
    pub fn blob_count(&self) -> usize {
        self.chain.len()
    }

    /// Make every store call fail until [`revive`](Self::revive).
    pub fn take_down(&self) {
        self.gate.down.store(true, Ordering::SeqCst);
    }

    /// Bring the node back online.
    pub fn revive(&self) {
        self.gate.down.store(false, Ordering::SeqCst);
    }

    /// Drop every blob committed below `height`, as a pruning node would.
    pub fn prune_below(&self, height: u64) -> usize {
        self.chain.prune_below(height)
    }
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// The harness namespace.
pub fn namespace() -> Namespace {
    Namespace::from_hex(TEST_NAMESPACE).unwrap()
}

// =========================================================================
// Data generation
// =========================================================================

/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize) -> Vec<u8> {
    test_data_seeded(size, 0xDEAD_BEEF)
}

/// Generate deterministic test data from a seed.
pub fn test_data_seeded(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}
