//! [`SkeinClient`]: splits payloads across blobs and reassembles them.
//!
//! A `SkeinClient` owns a shared blob store handle, the namespace every blob
//! is filed under, and the chunk size limit. It exposes the submit pipeline
//! (split → commit each chunk → commit manifest) and the read pipeline
//! (fetch root → detect manifest → fetch chunks → concatenate).
//!
//! Both pipelines are strictly sequential. Chunks are committed and fetched
//! one at a time, in payload order, and the first failure aborts the call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use skein_cas::{Chunk, Chunker, build_manifest, detect_manifest, serialize_manifest};
use skein_store::{BlobStore, StoreError};
use skein_types::*;
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::mime::{MagicSniffer, MimeSniffer, detect_mime};

/// Configuration for creating a [`SkeinClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Namespace all chunks and manifests are submitted under.
    pub namespace: Namespace,
    /// Maximum chunk size in bytes. Must be positive.
    pub max_chunk_size: usize,
    /// Upper bound on each individual store call. `None` waits indefinitely.
    pub store_timeout: Option<Duration>,
    /// Fail reads whose fetched sizes disagree with the manifest.
    pub verify_sizes: bool,
}

impl ClientConfig {
    /// Config with default limits for the given namespace.
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            store_timeout: None,
            verify_sizes: false,
        }
    }

    /// Reject settings that can never work.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_chunk_size == 0 {
            return Err(EngineError::Config(
                "max chunk size must be greater than zero".to_string(),
            ));
        }
        if self.store_timeout == Some(Duration::ZERO) {
            return Err(EngineError::Config(
                "store timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// What was committed by one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Locator to hand back for reads: the only chunk, or the manifest.
    pub root: BlobLocator,
    /// Locators of the data chunks, in payload order.
    pub chunks: Vec<BlobLocator>,
    /// The committed manifest, when the payload needed more than one chunk.
    pub manifest: Option<Manifest>,
}

/// What a root locator points at, as seen by [`SkeinClient::inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// The root blob is a manifest chaining several chunks.
    Manifest(Manifest),
    /// The root blob is the complete payload.
    Raw {
        /// Payload size in bytes.
        size: usize,
        /// Sniffed content type.
        mime_type: String,
    },
}

/// Client that stores oversized payloads on a bounded-blob store.
pub struct SkeinClient {
    /// Shared blob store handle.
    store: Arc<dyn BlobStore>,
    /// Namespace for every submitted blob.
    namespace: Namespace,
    /// Fixed-size splitter.
    chunker: Chunker,
    store_timeout: Option<Duration>,
    verify_sizes: bool,
    /// Used when a submit does not name a MIME type.
    sniffer: Arc<dyn MimeSniffer>,
}

impl SkeinClient {
    /// Create a client, validating the configuration first.
    pub fn new(config: ClientConfig, store: Arc<dyn BlobStore>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            store,
            namespace: config.namespace,
            chunker: Chunker::new(config.max_chunk_size)?,
            store_timeout: config.store_timeout,
            verify_sizes: config.verify_sizes,
            sniffer: Arc::new(MagicSniffer),
        })
    }

    /// Replace the MIME sniffer used by [`submit_reader`](Self::submit_reader).
    pub fn with_sniffer(mut self, sniffer: Arc<dyn MimeSniffer>) -> Self {
        self.sniffer = sniffer;
        self
    }

    /// The namespace blobs are submitted under.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Detect the MIME type of a payload with this client's sniffer.
    pub fn detect_mime(&self, data: &[u8]) -> String {
        detect_mime(self.sniffer.as_ref(), data)
    }

    // ------------------------------------------------------------------
    // Submit path
    // ------------------------------------------------------------------

    /// Store a payload and return its root locator.
    pub async fn submit(
        &self,
        data: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<BlobLocator, EngineError> {
        Ok(self.submit_with_receipt(data, name, mime_type).await?.root)
    }

    /// Store a payload and report every blob that was committed.
    pub async fn submit_with_receipt(
        &self,
        data: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<SubmitReceipt, EngineError> {
        let chunks = self.chunker.chunk(data);
        self.submit_chunks(chunks, name, mime_type).await
    }

    /// Store a payload read from `reader`.
    ///
    /// When `mime_type` is `None` the type is sniffed from the first chunk.
    pub async fn submit_reader(
        &self,
        reader: impl AsyncRead + Unpin,
        name: &str,
        mime_type: Option<&str>,
    ) -> Result<SubmitReceipt, EngineError> {
        let chunks = self.chunker.chunk_stream(reader).await?;
        let mime_type = match mime_type {
            Some(m) => m.to_string(),
            None => chunks
                .first()
                .map(|c| self.detect_mime(&c.data))
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        };
        self.submit_chunks(chunks, name, &mime_type).await
    }

    async fn submit_chunks(
        &self,
        chunks: Vec<Chunk>,
        name: &str,
        mime_type: &str,
    ) -> Result<SubmitReceipt, EngineError> {
        if chunks.is_empty() {
            return Err(EngineError::EmptyPayload);
        }

        let total = chunks.len();
        let total_size: u64 = chunks.iter().map(|c| c.data.len() as u64).sum();
        info!(name, mime_type, total_size, chunks = total, "submit: starting");

        let mut entries = Vec::with_capacity(total);
        let mut locators = Vec::with_capacity(total);

        for chunk in chunks {
            let index = chunk.index;
            let size = chunk.data.len() as u64;

            let locator = self
                .commit(Bytes::from(chunk.data))
                .await
                .map_err(|source| EngineError::ChunkSubmit {
                    index,
                    total,
                    source,
                })?;

            info!(
                index,
                size,
                height = locator.height,
                commitment = %locator.commitment,
                "submitted chunk"
            );

            entries.push(ManifestEntry::new(&locator, size));
            locators.push(locator);
        }

        // A payload that fits in one blob is its own root.
        if locators.len() == 1 {
            let root = locators[0].clone();
            info!(%root, "submit: complete (single blob)");
            return Ok(SubmitReceipt {
                root,
                chunks: locators,
                manifest: None,
            });
        }

        let manifest = build_manifest(name, mime_type, entries);
        let bytes = serialize_manifest(&manifest)?;
        let manifest_size = bytes.len();

        let root = self
            .commit(Bytes::from(bytes))
            .await
            .map_err(EngineError::ManifestSubmit)?;

        info!(
            %root,
            manifest_size,
            chunks = locators.len(),
            "submit: complete (manifest)"
        );

        Ok(SubmitReceipt {
            root,
            chunks: locators,
            manifest: Some(manifest),
        })
    }

    /// Commit one blob, turning a height-zero answer into an error.
    async fn commit(&self, data: Bytes) -> Result<BlobLocator, StoreError> {
        let submitted = self
            .bounded(self.store.submit(&self.namespace, data))
            .await?;
        if submitted.height == 0 {
            return Err(StoreError::ZeroHeight);
        }
        Ok(BlobLocator {
            height: submitted.height,
            namespace: self.namespace,
            commitment: submitted.commitment,
        })
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Reconstruct the payload addressed by `root`.
    ///
    /// A root blob that parses as a manifest is expanded into its chunks;
    /// anything else is returned unchanged as the complete payload.
    pub async fn read(&self, root: &BlobLocator) -> Result<Vec<u8>, EngineError> {
        let blob = self.fetch_root(root).await?;

        let Some(manifest) = detect_manifest(&blob) else {
            info!(%root, size = blob.len(), "read: complete (single blob)");
            return Ok(blob.to_vec());
        };

        info!(
            name = %manifest.name,
            mime_type = %manifest.mime_type,
            size = manifest.size,
            chunks = manifest.chunks.len(),
            "detected manifest, fetching chunks"
        );
        self.read_manifest(&manifest).await
    }

    /// Report whether `root` is a manifest or a raw payload, without
    /// fetching any chunks.
    pub async fn inspect(&self, root: &BlobLocator) -> Result<Inspection, EngineError> {
        let blob = self.fetch_root(root).await?;
        Ok(match detect_manifest(&blob) {
            Some(manifest) => Inspection::Manifest(manifest),
            None => Inspection::Raw {
                size: blob.len(),
                mime_type: self.detect_mime(&blob),
            },
        })
    }

    /// Fetch every chunk of `manifest` in order and concatenate them.
    pub async fn read_manifest(&self, manifest: &Manifest) -> Result<Vec<u8>, EngineError> {
        // Decode every entry before the first fetch.
        let locators = manifest
            .chunks
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .locator()
                    .map_err(|source| EngineError::InvalidEntry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut data = Vec::new();

        for (index, (entry, locator)) in manifest.chunks.iter().zip(&locators).enumerate() {
            debug!(index, %locator, "fetching chunk");

            let chunk = self
                .bounded(
                    self.store
                        .get(locator.height, &locator.namespace, &locator.commitment),
                )
                .await
                .map_err(|source| EngineError::ChunkFetch {
                    index,
                    locator: entry.blob.clone(),
                    source,
                })?;

            self.check_size(
                || format!("chunk {index}"),
                entry.size,
                chunk.len() as u64,
            )?;
            data.extend_from_slice(&chunk);

            info!(
                index,
                height = locator.height,
                fetched = data.len(),
                total = manifest.size,
                "fetched chunk"
            );
        }

        self.check_size(|| "payload".to_string(), manifest.size, data.len() as u64)?;
        Ok(data)
    }

    async fn fetch_root(&self, root: &BlobLocator) -> Result<Bytes, EngineError> {
        debug!(%root, "fetching root blob");
        self.bounded(
            self.store
                .get(root.height, &root.namespace, &root.commitment),
        )
        .await
        .map_err(|source| EngineError::RootFetch {
            locator: root.to_string(),
            source,
        })
    }

    fn check_size(
        &self,
        what: impl FnOnce() -> String,
        declared: u64,
        actual: u64,
    ) -> Result<(), EngineError> {
        if declared == actual {
            return Ok(());
        }
        let what = what();
        if self.verify_sizes {
            return Err(EngineError::SizeMismatch {
                what,
                declared,
                actual,
            });
        }
        warn!(what = %what, declared, actual, "fetched size differs from manifest");
        Ok(())
    }

    /// Apply the configured per-call timeout to a store call.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => call.await,
        }
    }
}
