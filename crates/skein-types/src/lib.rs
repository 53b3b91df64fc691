//! Shared types for Skein.
//!
//! This crate defines the types passed between the Skein crates:
//! addressing ([`Namespace`], [`Commitment`], [`BlobLocator`]) and the
//! manifest record ([`Manifest`], [`ManifestEntry`]) that chains the chunks
//! of an oversized payload together.

mod error;
mod locator;
mod namespace;

use serde::{Deserialize, Serialize};

pub use error::TypesError;
pub use locator::{BlobLocator, Commitment, LOCATOR_SEPARATOR};
pub use namespace::{NAMESPACE_ID_SIZE, NAMESPACE_SIZE, NAMESPACE_VERSION_ZERO, Namespace};

/// Default maximum chunk size in bytes.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1_500_000;

/// Content type used when none is given and sniffing finds nothing.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Record chaining the chunks of one payload.
///
/// Stored as one extra blob when a payload needs more than one chunk. The
/// JSON field names are fixed; there is no version or checksum field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Original file name or identifier.
    pub name: String,
    /// Content type of the payload.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Total payload size in bytes.
    pub size: u64,
    /// Chunk locators, in payload order.
    pub chunks: Vec<ManifestEntry>,
}

/// One chunk reference inside a [`Manifest`].
///
/// The locator is kept as a string so that a malformed entry in a fetched
/// manifest is reported at the entry that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Encoded [`BlobLocator`] of the chunk.
    pub blob: String,
    /// Chunk size in bytes.
    pub size: u64,
}

impl ManifestEntry {
    /// Build an entry for a committed chunk.
    pub fn new(locator: &BlobLocator, size: u64) -> Self {
        Self {
            blob: locator.encode(),
            size,
        }
    }

    /// Decode the entry's locator string.
    pub fn locator(&self) -> Result<BlobLocator, TypesError> {
        BlobLocator::decode(&self.blob)
    }
}

impl Manifest {
    /// Sum of the declared chunk sizes.
    pub fn chunk_total(&self) -> u64 {
        self.chunks.iter().map(|c| c.size).sum()
    }
}
