//! Merge into a timestamp-aware store.
//!
//! Used for two legs of replication: copying a header-free store into its
//! timestamped shadow with the pass default timestamp, and merging a remote
//! snapshot whose entries already carry timestamps.

use lww_codec::{decode, is_tombstone, HeaderCodec, HEADER_SIZE};
use lww_types::{Entry, Timestamp};

use crate::error::{corrupt_value, MergeError, MergeResult};
use crate::iterator::{Cursor, MergeIterator};

/// Last-writer-wins merge iterator over a timestamped destination.
///
/// Decision rules for the current entry against the destination value:
///
/// - absent destination: write the entry with its timestamp, or the default;
/// - untimestamped entry equal to the stored payload: keep the stored value;
/// - older entry: keep the stored value;
/// - equal timestamps: the lexicographically smaller payload wins;
/// - otherwise: write the entry.
///
/// Destination keys missing from the source become tombstones dated at the
/// default timestamp.
#[derive(Debug)]
pub struct TimestampedIterator {
    cursor: Cursor,
    default_timestamp: Timestamp,
    codec: HeaderCodec,
}

impl TimestampedIterator {
    /// Create an iterator over `entries`, which must be sorted by key in
    /// strictly ascending byte order.
    ///
    /// `default_timestamp` is used for entries without a timestamp and for
    /// tombstones. It is fixed for the lifetime of the pass.
    pub fn new(entries: Vec<Entry>, default_timestamp: Timestamp) -> Self {
        Self {
            cursor: Cursor::new(entries),
            default_timestamp,
            codec: HeaderCodec::new(),
        }
    }

    /// The timestamp assigned to untimestamped entries and tombstones.
    pub fn default_timestamp(&self) -> Timestamp {
        self.default_timestamp
    }

    /// Number of entries in the source sequence.
    pub fn entry_count(&self) -> usize {
        self.cursor.len()
    }
}

impl MergeIterator for TimestampedIterator {
    fn advance(&mut self) -> Option<&[u8]> {
        self.cursor.advance()
    }

    fn decide<'a>(&'a mut self, current: &'a [u8]) -> MergeResult<&'a [u8]> {
        let entry = self.cursor.entry()?;
        if current.is_empty() {
            return stamp(
                &mut self.codec,
                &entry.value,
                entry.timestamp,
                self.default_timestamp,
            );
        }
        if current.len() < HEADER_SIZE {
            return Err(corrupt_value(&entry.key, current));
        }

        let (old_ts, old_payload) = decode(current)?;
        let mut new_ts = entry.timestamp;
        if new_ts.is_zero() {
            // Unchanged payload from an untimestamped source must not bump
            // the stored timestamp.
            if old_payload == entry.value.as_slice() {
                return Ok(current);
            }
            new_ts = self.default_timestamp;
        }
        if new_ts < old_ts {
            return Ok(current);
        }
        if new_ts == old_ts && old_payload <= entry.value.as_slice() {
            return Ok(current);
        }
        stamp(&mut self.codec, &entry.value, new_ts, self.default_timestamp)
    }

    fn reconcile<'a>(&'a mut self, current: &'a [u8]) -> MergeResult<Option<&'a [u8]>> {
        if is_tombstone(current) {
            return Ok(Some(current));
        }
        stamp(&mut self.codec, &[], Timestamp::ZERO, self.default_timestamp).map(Some)
    }
}

/// Encode `payload` with `ts`, falling back to `default`.
fn stamp<'a>(
    codec: &'a mut HeaderCodec,
    payload: &[u8],
    ts: Timestamp,
    default: Timestamp,
) -> MergeResult<&'a [u8]> {
    let ts = ts.or(default);
    if ts.is_zero() {
        return Err(MergeError::NoTimestamp);
    }
    Ok(codec.encode(payload, ts))
}
