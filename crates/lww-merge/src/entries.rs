//! Builders for source entry sequences.
//!
//! Store scans come back as ascending `(key, value)` pairs. These helpers
//! turn them into the [`Entry`] sequences the merge iterators consume.

use lww_codec::{decode, is_tombstone, HEADER_SIZE};
use lww_store::KvPair;
use lww_types::{Entry, Timestamp};

use crate::error::{corrupt_value, MergeError, MergeResult};

/// Entries for a header-free store. Every entry relies on the pass default
/// timestamp.
pub fn untimestamped_entries(pairs: Vec<KvPair>) -> Vec<Entry> {
    pairs
        .into_iter()
        .map(|(key, value)| Entry::untimestamped(key, value))
        .collect()
}

/// Entries for a timestamp-aware store, keeping tombstones.
///
/// A tombstone becomes an entry with an empty value and the tombstone's
/// timestamp, so the deletion stays comparable on the receiving side.
pub fn timestamped_entries(pairs: Vec<KvPair>) -> MergeResult<Vec<Entry>> {
    pairs
        .into_iter()
        .map(|(key, value)| {
            let (timestamp, payload) = split(&key, &value)?;
            Ok(Entry::new(key, payload, timestamp))
        })
        .collect()
}

/// Entries for propagating a timestamp-aware store into a header-free one.
///
/// Headers are stripped and tombstones are dropped, so deleted keys are
/// absent from the sequence.
pub fn plain_entries(pairs: Vec<KvPair>) -> MergeResult<Vec<Entry>> {
    let mut entries = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if is_tombstone(&value) {
            continue;
        }
        let (timestamp, payload) = split(&key, &value)?;
        entries.push(Entry::new(key, payload, timestamp));
    }
    Ok(entries)
}

/// Check that keys are strictly ascending and unique.
pub fn check_order(entries: &[Entry]) -> MergeResult<()> {
    match entries.windows(2).position(|w| w[0].key >= w[1].key) {
        Some(i) => Err(MergeError::UnsortedEntries { index: i + 1 }),
        None => Ok(()),
    }
}

fn split<'v>(key: &[u8], value: &'v [u8]) -> MergeResult<(Timestamp, &'v [u8])> {
    if value.len() < HEADER_SIZE {
        return Err(corrupt_value(key, value));
    }
    Ok(decode(value)?)
}
