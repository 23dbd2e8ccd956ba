//! Merge engine for last-writer-wins replication.
//!
//! Decides, per key, which value survives when a source entry sequence is
//! merged into a destination store. Values in timestamp-aware stores carry an
//! 8-byte big-endian timestamp header (see `lww-codec`); a bare header is a
//! tombstone.
//!
//! # Key Types
//!
//! - [`MergeIterator`] -- the advancing contract the merge-join driver calls
//! - [`TimestampedIterator`] -- LWW decisions into a timestamped store
//! - [`PlainIterator`] -- verbatim copy into a header-free store
//! - [`merge_join`] / [`Strategy`] / [`MergeStats`] -- the driver loop
//! - [`SyncPass`] -- the three legs of one replica exchange
//! - [`MergeConfig`] -- pass configuration, loadable from TOML
//!
//! # Conflict Rules
//!
//! 1. The greater timestamp wins.
//! 2. On equal timestamps, the lexicographically smaller payload wins, so
//!    every replica picks the same value regardless of merge order.
//! 3. Deletions are tombstones dated at the pass timestamp and compete
//!    under the same rules as writes.

pub mod config;
pub mod driver;
pub mod entries;
pub mod error;
pub mod iterator;
pub mod pass;
pub mod plain;
pub mod timestamped;

pub use config::MergeConfig;
pub use driver::{merge_join, MergeStats, Strategy};
pub use entries::{check_order, plain_entries, timestamped_entries, untimestamped_entries};
pub use error::{MergeError, MergeResult};
pub use iterator::MergeIterator;
pub use pass::SyncPass;
pub use plain::PlainIterator;
pub use timestamped::TimestampedIterator;
