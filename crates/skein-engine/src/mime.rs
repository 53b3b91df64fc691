//! Best-effort content-type detection.
//!
//! The manifest records a MIME type for the payload. When the caller does
//! not supply one, a [`MimeSniffer`] looks at the first [`SNIFF_LEN`] bytes.
//! [`MagicSniffer`] matches a table of well-known file signatures.

use skein_types::DEFAULT_MIME_TYPE;

/// Number of leading bytes handed to a sniffer.
pub const SNIFF_LEN: usize = 262;

/// Detects a content type from a payload prefix.
pub trait MimeSniffer: Send + Sync {
    /// Return the MIME type of `prefix`, or `None` when unknown.
    fn sniff(&self, prefix: &[u8]) -> Option<&'static str>;
}

/// Signature-table sniffer covering common archive, image, media and document formats.
#[derive(Debug, Default, Clone, Copy)]
pub struct MagicSniffer;

/// `(offset, signature, mime)`; first match wins.
const SIGNATURES: &[(usize, &[u8], &str)] = &[
    (0, b"\x89PNG\r\n\x1a\n", "image/png"),
    (0, b"\xff\xd8\xff", "image/jpeg"),
    (0, b"GIF87a", "image/gif"),
    (0, b"GIF89a", "image/gif"),
    (0, b"%PDF-", "application/pdf"),
    (0, b"PK\x03\x04", "application/zip"),
    (0, b"\x1f\x8b", "application/gzip"),
    (0, b"BZh", "application/x-bzip2"),
    (0, b"\xfd7zXZ\x00", "application/x-xz"),
    (0, b"\x28\xb5\x2f\xfd", "application/zstd"),
    (0, b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    (257, b"ustar", "application/x-tar"),
    (0, b"\x7fELF", "application/x-executable"),
    (0, b"\x00asm", "application/wasm"),
    (0, b"ID3", "audio/mpeg"),
    (0, b"OggS", "audio/ogg"),
    (0, b"fLaC", "audio/x-flac"),
    (4, b"ftyp", "video/mp4"),
    (0, b"\x1a\x45\xdf\xa3", "video/webm"),
];

impl MimeSniffer for MagicSniffer {
    fn sniff(&self, prefix: &[u8]) -> Option<&'static str> {
        // RIFF containers carry their format at offset 8.
        if prefix.starts_with(b"RIFF") && prefix.len() >= 12 {
            return match &prefix[8..12] {
                b"WEBP" => Some("image/webp"),
                b"WAVE" => Some("audio/x-wav"),
                b"AVI " => Some("video/x-msvideo"),
                _ => None,
            };
        }

        SIGNATURES
            .iter()
            .find(|(offset, sig, _)| {
                prefix
                    .get(*offset..offset + sig.len())
                    .is_some_and(|window| window == *sig)
            })
            .map(|(_, _, mime)| *mime)
    }
}

/// Sniff `data` and fall back to `application/octet-stream`.
pub fn detect_mime(sniffer: &dyn MimeSniffer, data: &[u8]) -> String {
    let prefix = &data[..data.len().min(SNIFF_LEN)];
    sniffer
        .sniff(prefix)
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}
