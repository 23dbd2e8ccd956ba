//! Merge-join of a source iterator against a destination store.

use std::time::{Duration, Instant};

use lww_store::KvStore;
use lww_types::{display_ascii, round_millis};
use tracing::{debug, trace};

use crate::error::{MergeError, MergeResult};
use crate::iterator::MergeIterator;

/// How destination keys without a source entry are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Full merge: destination-only keys go through
    /// [`MergeIterator::reconcile`].
    #[default]
    Merge,
    /// Upsert only: destination-only keys are left untouched. Used when the
    /// source is a remote snapshot, where a missing key says nothing about
    /// deletion.
    Upsert,
}

/// Counters collected during one merge-join.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Source entries visited.
    pub visited: usize,
    /// Source keys that were absent from the destination.
    pub inserted: usize,
    /// Existing destination values that were replaced.
    pub updated: usize,
    /// Keys whose decided value equalled the current one.
    pub unchanged: usize,
    /// Destination-only keys rewritten by `reconcile` (tombstoned).
    pub reconciled: usize,
    /// Destination-only keys deleted by `reconcile`.
    pub deleted: usize,
    /// Destination-only keys skipped under [`Strategy::Upsert`].
    pub untouched: usize,
    /// Wall time of the merge-join.
    pub elapsed: Duration,
}

impl MergeStats {
    /// Number of writes and deletes applied to the destination.
    pub fn changes(&self) -> usize {
        self.inserted + self.updated + self.reconciled + self.deleted
    }
}

/// Walk `iter` in lockstep with the keys of `store` and apply every decision.
///
/// Source keys must be strictly ascending; a key that does not sort after its
/// predecessor fails with [`MergeError::UnsortedEntries`] before it is
/// decided. Each source key is decided against the destination's current
/// value (empty if absent). Under
/// [`Strategy::Merge`], destination keys that the source lacks are passed to
/// `reconcile`. Writes whose value equals the current value are skipped.
///
/// Any error aborts the join; writes already applied are not rolled back,
/// which is left to a surrounding transaction.
pub fn merge_join<I, S>(iter: &mut I, store: &S, strategy: Strategy) -> MergeResult<MergeStats>
where
    I: MergeIterator + ?Sized,
    S: KvStore + ?Sized,
{
    let started = Instant::now();
    let mut stats = MergeStats::default();
    let mut dest = store.scan()?.into_iter().peekable();
    let mut prev: Option<Vec<u8>> = None;

    while let Some(key) = iter.advance().map(<[u8]>::to_vec) {
        if prev.as_ref().is_some_and(|p| key <= *p) {
            return Err(MergeError::UnsortedEntries {
                index: stats.visited,
            });
        }
        stats.visited += 1;

        while let Some((dest_key, dest_val)) = dest.next_if(|(k, _)| k.as_slice() < key.as_slice()) {
            reconcile_key(iter, store, strategy, &dest_key, &dest_val, &mut stats)?;
        }

        let current = dest.next_if(|(k, _)| *k == key).map(|(_, v)| v);
        let decided = iter.decide(current.as_deref().unwrap_or_default())?;
        match current.as_deref() {
            Some(old) if old == decided => stats.unchanged += 1,
            Some(_) => {
                trace!(key = %display_ascii(&key), "update");
                store.put(&key, decided)?;
                stats.updated += 1;
            }
            None => {
                trace!(key = %display_ascii(&key), "insert");
                store.put(&key, decided)?;
                stats.inserted += 1;
            }
        }
        prev = Some(key);
    }

    for (dest_key, dest_val) in dest {
        reconcile_key(iter, store, strategy, &dest_key, &dest_val, &mut stats)?;
    }

    stats.elapsed = started.elapsed();
    debug!(
        visited = stats.visited,
        inserted = stats.inserted,
        updated = stats.updated,
        unchanged = stats.unchanged,
        reconciled = stats.reconciled,
        deleted = stats.deleted,
        untouched = stats.untouched,
        elapsed = ?round_millis(stats.elapsed),
        "merge-join complete"
    );
    Ok(stats)
}

fn reconcile_key<I, S>(
    iter: &mut I,
    store: &S,
    strategy: Strategy,
    key: &[u8],
    current: &[u8],
    stats: &mut MergeStats,
) -> MergeResult<()>
where
    I: MergeIterator + ?Sized,
    S: KvStore + ?Sized,
{
    if strategy == Strategy::Upsert {
        stats.untouched += 1;
        return Ok(());
    }
    match iter.reconcile(current)? {
        Some(value) if value == current => stats.unchanged += 1,
        Some(value) => {
            trace!(key = %display_ascii(key), "tombstone");
            store.put(key, value)?;
            stats.reconciled += 1;
        }
        None => {
            trace!(key = %display_ascii(key), "delete");
            store.delete(key)?;
            stats.deleted += 1;
        }
    }
    Ok(())
}
