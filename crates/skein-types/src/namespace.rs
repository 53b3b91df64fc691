//! Version-0 blob namespaces.
//!
//! A user supplies a short hex identifier (at most [`NAMESPACE_ID_SIZE`]
//! bytes). It is left-padded with zeros to a fixed 10-byte id. On the wire
//! the store expects the full [`NAMESPACE_SIZE`]-byte form: one version
//! byte, 18 reserved zero bytes, then the id.

use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Size of a version-0 namespace id in bytes.
pub const NAMESPACE_ID_SIZE: usize = 10;

/// Size of a full namespace (version byte + reserved prefix + id).
pub const NAMESPACE_SIZE: usize = 29;

/// Namespace version understood by this crate.
pub const NAMESPACE_VERSION_ZERO: u8 = 0;

const RESERVED_PREFIX_SIZE: usize = NAMESPACE_SIZE - 1 - NAMESPACE_ID_SIZE;

/// A version-0 namespace, stored as its padded 10-byte id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace([u8; NAMESPACE_ID_SIZE]);

impl Namespace {
    /// Build a namespace from a raw id of 1 to 10 bytes.
    pub fn from_id(id: &[u8]) -> Result<Self, TypesError> {
        if id.is_empty() {
            return Err(TypesError::EmptyNamespace);
        }
        if id.len() > NAMESPACE_ID_SIZE {
            return Err(TypesError::NamespaceTooLong {
                len: id.len(),
                max: NAMESPACE_ID_SIZE,
            });
        }
        let mut padded = [0u8; NAMESPACE_ID_SIZE];
        padded[NAMESPACE_ID_SIZE - id.len()..].copy_from_slice(id);
        Ok(Self(padded))
    }

    /// Decode a hex-encoded namespace id.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        if s.is_empty() {
            return Err(TypesError::EmptyNamespace);
        }
        let bytes = hex::decode(s).map_err(|source| TypesError::InvalidHex {
            field: "namespace",
            source,
        })?;
        Self::from_id(&bytes)
    }

    /// Parse the full 29-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        if bytes.len() != NAMESPACE_SIZE {
            return Err(TypesError::MalformedNamespace(format!(
                "expected {NAMESPACE_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0] != NAMESPACE_VERSION_ZERO {
            return Err(TypesError::MalformedNamespace(format!(
                "unsupported version {}",
                bytes[0]
            )));
        }
        if bytes[1..=RESERVED_PREFIX_SIZE].iter().any(|b| *b != 0) {
            return Err(TypesError::MalformedNamespace(
                "non-zero reserved prefix".to_string(),
            ));
        }
        let mut id = [0u8; NAMESPACE_ID_SIZE];
        id.copy_from_slice(&bytes[1 + RESERVED_PREFIX_SIZE..]);
        Ok(Self(id))
    }

    /// The padded 10-byte id.
    pub fn id(&self) -> &[u8; NAMESPACE_ID_SIZE] {
        &self.0
    }

    /// The full 29-byte wire form.
    pub fn to_bytes(&self) -> [u8; NAMESPACE_SIZE] {
        let mut out = [0u8; NAMESPACE_SIZE];
        out[0] = NAMESPACE_VERSION_ZERO;
        out[1 + RESERVED_PREFIX_SIZE..].copy_from_slice(&self.0);
        out
    }

    /// Hex encoding of the padded id (the form used inside locators).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Namespace {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({self})")
    }
}
