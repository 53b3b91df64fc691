//! Manifest building, serialization, and detection.
//!
//! A [`Manifest`] chains the chunks of a payload that did not fit in one
//! blob. It is serialized as JSON and committed as one more blob; its
//! locator becomes the root locator handed back to the caller.
//!
//! There is no type tag on the wire. A fetched blob is treated as a
//! manifest when it decodes into the full manifest schema and as a raw
//! payload otherwise.

use skein_types::{Manifest, ManifestEntry};
use tracing::trace;

use crate::error::CasError;

/// Build a [`Manifest`] from committed chunk entries.
///
/// The declared `size` is the sum of the entry sizes.
pub fn build_manifest(name: &str, mime_type: &str, chunks: Vec<ManifestEntry>) -> Manifest {
    let size = chunks.iter().map(|c| c.size).sum();
    Manifest {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size,
        chunks,
    }
}

/// Serialize a manifest to JSON bytes.
pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>, CasError> {
    serde_json::to_vec(manifest).map_err(|e| CasError::Serialization(e.to_string()))
}

/// Deserialize a manifest from JSON bytes.
///
/// All four fields must be present with the right types. Unknown fields are
/// ignored so the schema can grow without breaking older readers.
pub fn deserialize_manifest(bytes: &[u8]) -> Result<Manifest, CasError> {
    serde_json::from_slice(bytes).map_err(|e| CasError::Serialization(e.to_string()))
}

/// Interpret fetched blob bytes as a manifest, if they are one.
///
/// Returns `None` when the bytes do not match the manifest schema; the
/// caller then treats them as a complete raw payload.
pub fn detect_manifest(bytes: &[u8]) -> Option<Manifest> {
    // JSON objects start with '{' after optional whitespace.
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace())?;
    if *first != b'{' {
        return None;
    }
    match deserialize_manifest(bytes) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            trace!(error = %e, "blob is not a manifest");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_types::{BlobLocator, Commitment, Namespace};

    fn entry(height: u64, size: u64) -> ManifestEntry {
        let locator = BlobLocator::new(
            height,
            Namespace::from_hex("000008e5f679bf7116cb").unwrap(),
            Commitment::from_hex("0a0b0c").unwrap(),
        )
        .unwrap();
        ManifestEntry::new(&locator, size)
    }

    fn sample() -> Manifest {
        build_manifest(
            "archive.tar",
            "application/x-tar",
            vec![entry(10, 1024), entry(11, 500)],
        )
    }

    #[test]
    fn test_size_is_sum_of_entries() {
        let manifest = sample();
        assert_eq!(manifest.size, 1524);
        assert_eq!(manifest.chunks.len(), 2);
        assert_eq!(manifest.chunk_total(), manifest.size);
    }

    #[test]
    fn test_serialized_shape() {
        let bytes = serialize_manifest(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            r#"{"name":"archive.tar","mimeType":"application/x-tar","size":1524,"chunks":[{"blob":"10/000008e5f679bf7116cb/0a0b0c","size":1024},{"blob":"11/000008e5f679bf7116cb/0a0b0c","size":500}]}"#
        );
    }

    #[test]
    fn test_detect_serialized_manifest() {
        let manifest = sample();
        let bytes = serialize_manifest(&manifest).unwrap();
        assert_eq!(detect_manifest(&bytes), Some(manifest));
    }

    #[test]
    fn test_detect_tolerates_unknown_fields_and_whitespace() {
        let json = br#"
            {"name":"a","mimeType":"text/plain","size":3,"extra":true,
             "chunks":[{"blob":"1/01/ff","size":3,"crc":0}]}"#;
        let manifest = detect_manifest(json).unwrap();
        assert_eq!(manifest.size, 3);
        assert_eq!(manifest.chunks[0].blob, "1/01/ff");
    }

    #[test]
    fn test_detect_rejects_non_manifest_bytes() {
        let cases: &[&[u8]] = &[
            b"",
            b"plain text payload",
            &[0x89, b'P', b'N', b'G', 0x0d, 0x0a],
            b"{}",
            b"null",
            b"[1,2,3]",
            br#"{"name":"a","mimeType":"b","size":1}"#,
            br#"{"name":"a","mimeType":"b","size":-1,"chunks":[]}"#,
            br#"{"name":"a","mimeType":"b","size":1,"chunks":[{"blob":5,"size":1}]}"#,
            br#"{"name":"a","mimeType":"b","size":1,"chunks":[]"#,
        ];
        for case in cases {
            assert!(
                detect_manifest(case).is_none(),
                "{:?} should not be a manifest",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn test_empty_chunk_list_is_still_a_manifest() {
        let manifest = build_manifest("empty", "text/plain", Vec::new());
        assert_eq!(manifest.size, 0);
        let bytes = serialize_manifest(&manifest).unwrap();
        assert_eq!(detect_manifest(&bytes), Some(manifest));
    }

    #[test]
    fn test_deserialize_error_message() {
        let err = deserialize_manifest(b"{").unwrap_err();
        assert!(err.to_string().starts_with("serialization error"));
    }
}
