//! A [`BlobStore`] wrapper that adds latency and injected failures.
//!
//! `FaultyStore` wraps any `Arc<dyn BlobStore>`. It can sleep for a random
//! duration before each call (seeded RNG, reproducible across runs), fail
//! the n-th submit or get, or answer the n-th submit with height zero.
//!
//! # Example
//!
//! ```ignore
//! let faulty = FaultyStore::new(inner)
//!     .write_latency(10, 30)  // 10 to 30 ms per submit
//!     .fail_submit_at(2)      // third submit errors
//!     .seed(42);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use skein_types::{Commitment, Namespace};

use crate::error::StoreError;
use crate::traits::{BlobStore, Submitted};

/// A [`BlobStore`] wrapper that injects latency and failures.
///
/// Call indices are zero-based and counted separately for submits and gets.
pub struct FaultyStore {
    inner: Arc<dyn BlobStore>,
    read_latency_ms: (u64, u64),
    write_latency_ms: (u64, u64),
    fail_submit_at: Option<usize>,
    zero_height_at: Option<usize>,
    fail_get_at: Option<usize>,
    submits: AtomicUsize,
    gets: AtomicUsize,
    rng: Mutex<StdRng>,
}

impl FaultyStore {
    /// Wrap an existing store as a pass-through by default.
    pub fn new(inner: Arc<dyn BlobStore>) -> Self {
        Self {
            inner,
            read_latency_ms: (0, 0),
            write_latency_ms: (0, 0),
            fail_submit_at: None,
            zero_height_at: None,
            fail_get_at: None,
            submits: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            rng: Mutex::new(StdRng::seed_from_u64(0)),
        }
    }

    /// Set the read latency range in milliseconds (uniform random).
    pub fn read_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.read_latency_ms = (min_ms, max_ms);
        self
    }

    /// Set the write latency range in milliseconds (uniform random).
    pub fn write_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.write_latency_ms = (min_ms, max_ms);
        self
    }

    /// Reject the submit call with this index.
    pub fn fail_submit_at(mut self, index: usize) -> Self {
        self.fail_submit_at = Some(index);
        self
    }

    /// Answer the submit call with this index with height zero.
    pub fn zero_height_at(mut self, index: usize) -> Self {
        self.zero_height_at = Some(index);
        self
    }

    /// Fail the get call with this index.
    pub fn fail_get_at(mut self, index: usize) -> Self {
        self.fail_get_at = Some(index);
        self
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Number of submit calls seen so far.
    pub fn submit_calls(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    /// Number of get calls seen so far.
    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Sleep for a random duration in `[min, max]` milliseconds.
    async fn delay(&self, range: (u64, u64)) {
        let (min, max) = range;

        if max == 0 {
            return;
        }

        let ms = if min == max {
            min
        } else {
            self.rng
                .lock()
                .expect("lock poisoned")
                .random_range(min..=max)
        };

        if ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for FaultyStore {
    async fn submit(&self, namespace: &Namespace, data: Bytes) -> Result<Submitted, StoreError> {
        let call = self.submits.fetch_add(1, Ordering::SeqCst);
        self.delay(self.write_latency_ms).await;

        if self.fail_submit_at == Some(call) {
            return Err(StoreError::Rejected(format!("injected failure on submit {call}")));
        }
        let submitted = self.inner.submit(namespace, data).await?;
        if self.zero_height_at == Some(call) {
            return Ok(Submitted {
                height: 0,
                ..submitted
            });
        }
        Ok(submitted)
    }

    async fn get(
        &self,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> Result<Bytes, StoreError> {
        let call = self.gets.fetch_add(1, Ordering::SeqCst);
        self.delay(self.read_latency_ms).await;

        if self.fail_get_at == Some(call) {
            return Err(StoreError::Rejected(format!("injected failure on get {call}")));
        }
        self.inner.get(height, namespace, commitment).await
    }
}
