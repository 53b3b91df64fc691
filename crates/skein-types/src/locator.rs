//! Blob commitments and locators.
//!
//! A [`BlobLocator`] is the `(height, namespace, commitment)` triple that
//! addresses one committed blob. Its string form is
//! `"<height>/<namespace-hex>/<commitment-hex>"` and is the receipt a caller
//! keeps to read data back later.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypesError;
use crate::namespace::Namespace;

/// Separator between locator fields.
pub const LOCATOR_SEPARATOR: char = '/';

/// Store-defined cryptographic commitment binding a blob's content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment(Vec<u8>);

impl Commitment {
    /// Wrap raw commitment bytes. Empty commitments are rejected.
    pub fn new(bytes: Vec<u8>) -> Result<Self, TypesError> {
        if bytes.is_empty() {
            return Err(TypesError::EmptyCommitment);
        }
        Ok(Self(bytes))
    }

    /// Decode a hex-encoded commitment.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let bytes = hex::decode(s).map_err(|source| TypesError::InvalidHex {
            field: "commitment",
            source,
        })?;
        Self::new(bytes)
    }

    /// Raw commitment bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<[u8; 32]> for Commitment {
    fn from(digest: [u8; 32]) -> Self {
        Self(digest.to_vec())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let short = &hex[..hex.len().min(16)];
        write!(f, "Commitment({short})")
    }
}

/// Address of one committed blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobLocator {
    /// Height (block number) the blob was committed at. Never zero.
    pub height: u64,
    /// Namespace the blob was filed under.
    pub namespace: Namespace,
    /// Commitment returned by the store.
    pub commitment: Commitment,
}

impl BlobLocator {
    /// Build a locator, rejecting height zero.
    pub fn new(
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<Self, TypesError> {
        let locator = Self {
            height,
            namespace,
            commitment,
        };
        if height == 0 {
            return Err(TypesError::ZeroHeight(locator.to_string()));
        }
        Ok(locator)
    }

    /// Encode as `"<height>/<namespace-hex>/<commitment-hex>"`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode from the slash-delimited string form.
    pub fn decode(s: &str) -> Result<Self, TypesError> {
        let parts: Vec<&str> = s.split(LOCATOR_SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(TypesError::LocatorFieldCount {
                locator: s.to_string(),
                found: parts.len(),
            });
        }

        // `u64::from_str` accepts a leading `+`; locators never carry one.
        if parts[0].is_empty() || !parts[0].bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypesError::NonDecimalHeight(s.to_string()));
        }
        let height: u64 = parts[0]
            .parse()
            .map_err(|source| TypesError::InvalidHeight {
                locator: s.to_string(),
                source,
            })?;
        if height == 0 {
            return Err(TypesError::ZeroHeight(s.to_string()));
        }

        let wrap = |source: TypesError| TypesError::InvalidLocatorField {
            locator: s.to_string(),
            source: Box::new(source),
        };
        let namespace = Namespace::from_hex(parts[1]).map_err(wrap)?;
        let commitment = Commitment::from_hex(parts[2]).map_err(wrap)?;

        Ok(Self {
            height,
            namespace,
            commitment,
        })
    }
}

impl fmt::Display for BlobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.height,
            self.namespace,
            self.commitment,
            sep = LOCATOR_SEPARATOR
        )
    }
}

impl FromStr for BlobLocator {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for BlobLocator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlobLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
