//! Chunked submit and manifest-driven reconstruction.
//!
//! The [`SkeinClient`] stores payloads of any size on a store that only
//! accepts bounded blobs. Payloads that fit in one blob are committed as-is.
//! Larger payloads are split into chunks, each chunk is committed, and a
//! JSON manifest listing the chunk locators is committed last; its locator
//! is the root handed back to the caller.

pub mod client;
pub mod error;
pub mod mime;

pub use client::{ClientConfig, Inspection, SkeinClient, SubmitReceipt};
pub use error::EngineError;
pub use mime::{MagicSniffer, MimeSniffer, SNIFF_LEN, detect_mime};

#[cfg(test)]
mod tests;
