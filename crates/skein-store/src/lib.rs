//! Blob store trait and backend implementations.
//!
//! This crate defines the [`BlobStore`] trait for committing and fetching
//! bounded-size blobs, along with three concrete backends:
//!
//! - [`MemoryBlobStore`]: in-memory storage backed by a `RwLock<HashMap>`.
//! - [`RpcBlobStore`]: JSON-RPC client for a data-availability node.
//! - [`FaultyStore`]: wrapper injecting latency and failures, for tests.

mod error;
mod faulty_store;
mod memory_store;
mod rpc_store;
mod traits;

pub use error::StoreError;
pub use faulty_store::FaultyStore;
pub use memory_store::MemoryBlobStore;
pub use rpc_store::RpcBlobStore;
pub use traits::{BlobStore, Submitted};
