//! # Codec Errors
//!
//! Error types for block and transaction codec operations.
//!
//! Item-level errors are produced by the injected item codec and reach the
//! caller unmodified: `CodecError::ItemEncode` / `CodecError::ItemDecode` are
//! transparent wrappers, so `Display` and `source()` are the item error's own.

use thiserror::Error;

/// A single transaction could not be converted to its persistable form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemEncodeError {
    /// A field of the transaction holds a value the codec cannot represent.
    #[error("Malformed field `{field}`: {reason}")]
    MalformedField { field: String, reason: String },

    /// The transaction variant has no persistable form.
    #[error("Unsupported transaction variant: {0}")]
    UnsupportedVariant(String),

    /// The underlying serializer failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The codec refused the transaction.
    #[error("{0}")]
    Rejected(String),

    /// The item codec gave up waiting on an external resource.
    #[error("Transaction encode timed out")]
    Timeout,
}

/// A persistable transaction form could not be reconstructed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemDecodeError {
    /// A required field is absent from the persisted form.
    #[error("Missing required field `{0}`")]
    MissingField(String),

    /// The persisted form names a transaction variant the codec does not know.
    #[error("Unsupported transaction variant: {0}")]
    UnsupportedVariant(String),

    /// Integrity check over the persisted payload failed.
    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The persisted form is not shaped like a transaction.
    #[error("Malformed transaction: {0}")]
    Malformed(String),

    /// The item codec gave up waiting on an external resource.
    #[error("Transaction decode timed out")]
    Timeout,
}

/// Errors returned by the block codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// First transaction encode failure observed during fan-out.
    #[error(transparent)]
    ItemEncode(#[from] ItemEncodeError),

    /// First transaction decode failure; later items were never attempted.
    #[error(transparent)]
    ItemDecode(#[from] ItemDecodeError),

    /// Several failures reported together.
    ///
    /// Reserved: the codec is fail-fast and currently only ever surfaces the
    /// first error it observes.
    #[error("{} codec errors", .0.len())]
    Aggregation(Vec<CodecError>),

    /// The representation does not have the shape of a persisted block.
    #[error("Malformed block representation: {0}")]
    MalformedRepresentation(String),

    /// Block holds more transactions than the codec is configured to accept.
    #[error("Too many transactions: {count} > {max}")]
    TooManyTransactions { count: usize, max: usize },

    /// Rejected codec configuration.
    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),
}
