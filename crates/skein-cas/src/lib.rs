//! Payload splitting and manifest encoding.
//!
//! This crate provides:
//! - [`Chunker`]: splits a payload into fixed-size chunks no larger than the
//!   store's blob limit.
//! - [`build_manifest`]: constructs a [`Manifest`](skein_types::Manifest)
//!   from the locators of committed chunks.
//! - [`detect_manifest`]: decides whether fetched blob bytes are a manifest
//!   or a raw payload.
//!
//! The manifest itself is committed as a regular blob: serialized as JSON,
//! then stored under the same namespace as the chunks it references.

mod chunker;
mod error;
mod manifest;

pub use chunker::{Chunk, Chunker};
pub use error::CasError;
pub use manifest::{build_manifest, deserialize_manifest, detect_manifest, serialize_manifest};
