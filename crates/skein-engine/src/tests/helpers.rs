//! Shared test utilities for skein-engine tests.

use std::sync::Arc;

use bytes::Bytes;
use skein_store::{BlobStore, MemoryBlobStore};
use skein_types::{BlobLocator, Namespace};

use crate::client::{ClientConfig, SkeinClient};

/// Blob limit of the test store. Chunk sizes in tests stay at or below it.
pub const TEST_MAX_BLOB: usize = 64 * 1024;

/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

pub fn test_namespace() -> Namespace {
    Namespace::from_hex("000008e5f679bf7116cb").unwrap()
}

pub fn config(chunk_size: usize) -> ClientConfig {
    ClientConfig {
        max_chunk_size: chunk_size,
        ..ClientConfig::new(test_namespace())
    }
}

/// A client over a fresh in-memory store. The store is returned too so tests
/// can look at what was committed.
pub fn memory_client(chunk_size: usize) -> (SkeinClient, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new(TEST_MAX_BLOB));
    let client = client_over(store.clone(), config(chunk_size));
    (client, store)
}

/// A client over an arbitrary store.
pub fn client_over(store: Arc<dyn BlobStore>, config: ClientConfig) -> SkeinClient {
    SkeinClient::new(config, store).unwrap()
}

/// Commit `data` straight into the store, bypassing the client.
pub async fn put_raw(store: &MemoryBlobStore, data: Vec<u8>) -> BlobLocator {
    let ns = test_namespace();
    let submitted = store.submit(&ns, Bytes::from(data)).await.unwrap();
    BlobLocator::new(submitted.height, ns, submitted.commitment).unwrap()
}
