//! One replica exchange, split into its three legs.
//!
//! A replica keeps a header-free *main* store for readers and a timestamped
//! *shadow* store that carries the conflict state. A sync pass:
//!
//! 1. folds local changes from main into shadow ([`SyncPass::main_to_shadow`]);
//! 2. merges remote snapshots into shadow ([`SyncPass::apply_snapshot`]);
//! 3. publishes the resolved shadow back to main ([`SyncPass::shadow_to_main`]).
//!
//! [`SyncPass::export_snapshot`] produces the entries other replicas merge in
//! step 2.

use lww_store::KvStore;
use lww_types::{Entry, Timestamp};
use tracing::info;

use crate::config::MergeConfig;
use crate::driver::{merge_join, MergeStats, Strategy};
use crate::entries::{check_order, plain_entries, timestamped_entries, untimestamped_entries};
use crate::error::MergeResult;
use crate::plain::PlainIterator;
use crate::timestamped::TimestampedIterator;

/// State shared by the legs of one sync pass.
///
/// The default timestamp is resolved once when the pass is created, so every
/// write and tombstone produced by the pass carries the same time.
#[derive(Clone, Debug)]
pub struct SyncPass {
    default_timestamp: Timestamp,
    verify_order: bool,
}

impl SyncPass {
    /// Start a pass, resolving the default timestamp from `config`.
    pub fn new(config: &MergeConfig) -> MergeResult<Self> {
        Ok(Self {
            default_timestamp: config.resolve_default_timestamp()?,
            verify_order: config.verify_order,
        })
    }

    /// Start a pass with an explicit default timestamp.
    pub fn with_timestamp(default_timestamp: Timestamp) -> Self {
        Self {
            default_timestamp,
            verify_order: true,
        }
    }

    /// The timestamp assigned to local changes and tombstones in this pass.
    pub fn default_timestamp(&self) -> Timestamp {
        self.default_timestamp
    }

    /// Fold the header-free main store into the shadow store.
    ///
    /// Changed or new keys get the pass timestamp; keys that disappeared from
    /// main are tombstoned in shadow.
    ///
    /// A key holding an empty value in main encodes to a bare header, which
    /// is a tombstone: the next [`SyncPass::shadow_to_main`] deletes it from
    /// main. Main cannot keep an empty value across a pass.
    pub fn main_to_shadow<M, S>(&self, main: &M, shadow: &S) -> MergeResult<MergeStats>
    where
        M: KvStore + ?Sized,
        S: KvStore + ?Sized,
    {
        let entries = untimestamped_entries(main.scan()?);
        let mut iter = TimestampedIterator::new(entries, self.default_timestamp);
        let stats = merge_join(&mut iter, shadow, Strategy::Merge)?;
        info!(changes = stats.changes(), visited = stats.visited, "main merged into shadow");
        Ok(stats)
    }

    /// Merge a remote snapshot into the shadow store.
    ///
    /// Keys missing from the snapshot are left alone.
    pub fn apply_snapshot<S>(&self, entries: Vec<Entry>, shadow: &S) -> MergeResult<MergeStats>
    where
        S: KvStore + ?Sized,
    {
        if self.verify_order {
            check_order(&entries)?;
        }
        let mut iter = TimestampedIterator::new(entries, self.default_timestamp);
        let stats = merge_join(&mut iter, shadow, Strategy::Upsert)?;
        info!(changes = stats.changes(), visited = stats.visited, "snapshot merged into shadow");
        Ok(stats)
    }

    /// Publish the resolved shadow store to the header-free main store.
    pub fn shadow_to_main<S, M>(&self, shadow: &S, main: &M) -> MergeResult<MergeStats>
    where
        S: KvStore + ?Sized,
        M: KvStore + ?Sized,
    {
        let entries = plain_entries(shadow.scan()?)?;
        let mut iter = PlainIterator::new(entries);
        let stats = merge_join(&mut iter, main, Strategy::Merge)?;
        info!(changes = stats.changes(), visited = stats.visited, "shadow published to main");
        Ok(stats)
    }

    /// Entries describing the shadow store, tombstones included.
    pub fn export_snapshot<S>(&self, shadow: &S) -> MergeResult<Vec<Entry>>
    where
        S: KvStore + ?Sized,
    {
        timestamped_entries(shadow.scan()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use lww_codec::encode_to_vec;
    use lww_store::InMemoryKvStore;

    fn ts(nanos: u64) -> Timestamp {
        Timestamp::from_nanos(nanos)
    }

    fn enc(payload: &str, nanos: u64) -> Vec<u8> {
        encode_to_vec(payload.as_bytes(), ts(nanos))
    }

    /// A replica with its main and shadow stores.
    struct Replica {
        main: InMemoryKvStore,
        shadow: InMemoryKvStore,
    }

    impl Replica {
        fn new() -> Self {
            Self {
                main: InMemoryKvStore::new(),
                shadow: InMemoryKvStore::new(),
            }
        }

        fn value(&self, key: &str) -> Option<Vec<u8>> {
            self.main.get(key.as_bytes()).unwrap()
        }

        /// Fold local changes into shadow and export a snapshot.
        fn publish(&self, at: u64) -> Vec<Entry> {
            let pass = SyncPass::with_timestamp(ts(at));
            pass.main_to_shadow(&self.main, &self.shadow).unwrap();
            pass.export_snapshot(&self.shadow).unwrap()
        }

        /// Merge a remote snapshot and publish to main.
        fn receive(&self, snapshot: Vec<Entry>, at: u64) {
            let pass = SyncPass::with_timestamp(ts(at));
            pass.main_to_shadow(&self.main, &self.shadow).unwrap();
            pass.apply_snapshot(snapshot, &self.shadow).unwrap();
            pass.shadow_to_main(&self.shadow, &self.main).unwrap();
        }
    }

    #[test]
    fn new_from_config() {
        let pass = SyncPass::new(&MergeConfig::with_default_timestamp(ts(42))).unwrap();
        assert_eq!(pass.default_timestamp(), ts(42));
    }

    #[test]
    fn main_to_shadow_stamps_and_tombstones() {
        let main = InMemoryKvStore::from_pairs([("a", "1"), ("b", "2")]);
        let shadow = InMemoryKvStore::from_pairs([
            (b"b".to_vec(), enc("2", 10)),
            (b"c".to_vec(), enc("3", 10)),
        ]);
        let stats = SyncPass::with_timestamp(ts(100))
            .main_to_shadow(&main, &shadow)
            .unwrap();

        assert_eq!(shadow.get(b"a").unwrap(), Some(enc("1", 100)));
        // Unchanged value keeps its old timestamp.
        assert_eq!(shadow.get(b"b").unwrap(), Some(enc("2", 10)));
        assert_eq!(shadow.get(b"c").unwrap(), Some(enc("", 100)));
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.reconciled, 1);
    }

    #[test]
    fn empty_main_value_becomes_tombstone() {
        let main = InMemoryKvStore::from_pairs([("a", ""), ("b", "1")]);
        let shadow = InMemoryKvStore::new();
        let pass = SyncPass::with_timestamp(ts(100));

        pass.main_to_shadow(&main, &shadow).unwrap();
        assert_eq!(shadow.get(b"a").unwrap(), Some(enc("", 100)));

        pass.shadow_to_main(&shadow, &main).unwrap();
        assert_eq!(main.get(b"a").unwrap(), None);
        assert_eq!(main.get(b"b").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn apply_snapshot_rejects_unsorted() {
        let shadow = InMemoryKvStore::new();
        let entries = vec![Entry::new("b", "1", ts(1)), Entry::new("a", "2", ts(1))];
        let err = SyncPass::with_timestamp(ts(5))
            .apply_snapshot(entries, &shadow)
            .unwrap_err();
        assert!(matches!(err, MergeError::UnsortedEntries { index: 1 }));
        assert!(shadow.is_empty().unwrap());
    }

    #[test]
    fn shadow_to_main_drops_tombstoned_keys() {
        let shadow = InMemoryKvStore::from_pairs([
            (b"a".to_vec(), enc("1", 10)),
            (b"b".to_vec(), enc("", 20)),
        ]);
        let main = InMemoryKvStore::from_pairs([("a", "old"), ("b", "2")]);
        SyncPass::with_timestamp(ts(30))
            .shadow_to_main(&shadow, &main)
            .unwrap();
        assert_eq!(main.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(main.get(b"b").unwrap(), None);
    }

    #[test]
    fn corrupt_shadow_aborts_publish() {
        let shadow = InMemoryKvStore::from_pairs([("a", "x")]);
        let main = InMemoryKvStore::new();
        let err = SyncPass::with_timestamp(ts(1))
            .shadow_to_main(&shadow, &main)
            .unwrap_err();
        assert!(matches!(err, MergeError::CorruptValue { .. }));
    }

    // -----------------------------------------------------------------------
    // Two-replica exchanges
    // -----------------------------------------------------------------------

    #[test]
    fn write_propagates_between_replicas() {
        let left = Replica::new();
        let right = Replica::new();
        left.main.put(b"k", b"v1").unwrap();

        right.receive(left.publish(100), 110);
        assert_eq!(right.value("k"), Some(b"v1".to_vec()));
    }

    #[test]
    fn later_delete_wins_over_earlier_write() {
        let left = Replica::new();
        let right = Replica::new();
        left.main.put(b"k", b"v1").unwrap();
        right.receive(left.publish(100), 110);

        right.main.delete(b"k").unwrap();
        left.receive(right.publish(200), 210);
        assert_eq!(left.value("k"), None);
        assert_eq!(left.shadow.get(b"k").unwrap(), Some(enc("", 200)));
    }

    #[test]
    fn later_write_resurrects_deleted_key() {
        let left = Replica::new();
        let right = Replica::new();
        left.main.put(b"k", b"v1").unwrap();
        right.receive(left.publish(100), 110);
        right.main.delete(b"k").unwrap();
        left.receive(right.publish(200), 210);

        left.main.put(b"k", b"v2").unwrap();
        right.receive(left.publish(300), 310);
        assert_eq!(right.value("k"), Some(b"v2".to_vec()));
    }

    #[test]
    fn concurrent_writes_converge() {
        let left = Replica::new();
        let right = Replica::new();
        left.main.put(b"k", b"from-left").unwrap();
        right.main.put(b"k", b"from-right").unwrap();

        // Same pass timestamp on both sides: the tie-break decides.
        let left_snap = left.publish(100);
        let right_snap = right.publish(100);
        left.receive(right_snap, 150);
        right.receive(left_snap, 150);

        assert_eq!(left.value("k"), Some(b"from-left".to_vec()));
        assert_eq!(right.value("k"), Some(b"from-left".to_vec()));
        assert_eq!(left.shadow.snapshot(), right.shadow.snapshot());
    }
}
