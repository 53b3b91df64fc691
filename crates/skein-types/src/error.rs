//! Error types for identifier and locator decoding.

/// Errors raised while building or decoding namespaces, commitments and locators.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// The namespace identifier was empty.
    #[error("namespace id cannot be blank")]
    EmptyNamespace,

    /// The namespace identifier exceeds the version-0 id size.
    #[error("namespace id is {len} bytes, at most {max} allowed")]
    NamespaceTooLong {
        /// Length of the supplied id.
        len: usize,
        /// Maximum id length.
        max: usize,
    },

    /// A full-width namespace had the wrong length or a non-zero reserved prefix.
    #[error("malformed namespace bytes: {0}")]
    MalformedNamespace(String),

    /// A hex-encoded field could not be decoded.
    #[error("invalid hex in {field}: {source}")]
    InvalidHex {
        /// Which field was being decoded (`namespace`, `commitment`).
        field: &'static str,
        /// Underlying decoder error.
        #[source]
        source: hex::FromHexError,
    },

    /// The commitment was empty.
    #[error("commitment cannot be empty")]
    EmptyCommitment,

    /// A locator string did not have exactly three `/`-separated fields.
    #[error("locator {locator:?} has {found} fields, expected 3")]
    LocatorFieldCount {
        /// The offending locator string.
        locator: String,
        /// Number of fields found.
        found: usize,
    },

    /// The height field of a locator contained something other than ASCII digits.
    #[error("locator {0:?} height must be plain decimal digits")]
    NonDecimalHeight(String),

    /// The height field of a locator did not fit a 64-bit height.
    #[error("locator {locator:?} has invalid height: {source}")]
    InvalidHeight {
        /// The offending locator string.
        locator: String,
        /// Underlying parse error.
        #[source]
        source: std::num::ParseIntError,
    },

    /// Height zero never addresses a committed blob.
    #[error("locator {0:?} has height 0")]
    ZeroHeight(String),

    /// A namespace or commitment field inside a locator failed to decode.
    #[error("locator {locator:?}: {source}")]
    InvalidLocatorField {
        /// The offending locator string.
        locator: String,
        /// The field-level error.
        #[source]
        source: Box<TypesError>,
    },
}
