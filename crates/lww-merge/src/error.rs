//! Error types for the merge crate.

use lww_codec::{CodecError, HEADER_SIZE};
use lww_store::StoreError;
use lww_types::display_ascii;
use tracing::error;

/// Errors that abort a merge pass.
///
/// None of these are recoverable per key: skipping a key would leave the
/// replicas permanently diverged for it, so callers abort the whole pass.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A value must be timestamped but neither the entry nor the pass
    /// provides a timestamp.
    #[error("no timestamp for entry")]
    NoTimestamp,

    /// A value in a timestamp-aware store is shorter than the header.
    #[error("corrupt value for key {key}: {len} bytes, need at least {min}")]
    CorruptValue { key: String, len: usize, min: usize },

    /// `decide` was called without a preceding successful `advance`.
    #[error("merge iterator is not positioned on an entry")]
    NotPositioned,

    /// Source entries are not in strictly ascending key order.
    #[error("source entries out of order at index {index}")]
    UnsortedEntries { index: usize },

    /// Invalid merge configuration.
    #[error("invalid merge configuration: {0}")]
    Config(String),

    /// Value header codec failure.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Destination store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;

/// Emit the corrupt value diagnostic and build the matching error.
pub(crate) fn corrupt_value(key: &[u8], value: &[u8]) -> MergeError {
    error!(
        key = %display_ascii(key),
        value = %display_ascii(value),
        key_hex = %hex::encode(key),
        value_hex = %hex::encode(value),
        "timestamped value shorter than header"
    );
    MergeError::CorruptValue {
        key: display_ascii(key),
        len: value.len(),
        min: HEADER_SIZE,
    }
}
