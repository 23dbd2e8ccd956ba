use lww_types::Entry;

use crate::error::{MergeError, MergeResult};

/// The advancing contract shared by both merge directions.
///
/// A driver walks the destination store in lockstep with the iterator:
///
/// 1. [`advance`](MergeIterator::advance) yields the next source key in
///    ascending order, or `None` once the source is exhausted.
/// 2. For that key, [`decide`](MergeIterator::decide) receives the
///    destination's current raw value (empty if absent) and returns the value
///    the destination should hold.
/// 3. For destination keys that have no source entry,
///    [`reconcile`](MergeIterator::reconcile) returns the value to write, or
///    `None` to delete the key.
///
/// Returned slices may borrow an internal scratch buffer and are only valid
/// until the next call on the iterator. An iterator belongs to exactly one
/// merge pass and is not meant to be shared.
pub trait MergeIterator {
    /// Move to the next source entry and return its key.
    fn advance(&mut self) -> Option<&[u8]>;

    /// Decide the new destination value for the current entry's key.
    fn decide<'a>(&'a mut self, current: &'a [u8]) -> MergeResult<&'a [u8]>;

    /// Decide what happens to a destination key absent from the source.
    fn reconcile<'a>(&'a mut self, current: &'a [u8]) -> MergeResult<Option<&'a [u8]>>;
}

/// Position over an owned, pre-sorted entry sequence.
#[derive(Debug)]
pub(crate) struct Cursor {
    entries: Vec<Entry>,
    next: usize,
    current: Option<usize>,
}

impl Cursor {
    pub(crate) fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            next: 0,
            current: None,
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&[u8]> {
        if self.next >= self.entries.len() {
            self.current = None;
            return None;
        }
        let index = self.next;
        self.current = Some(index);
        self.next += 1;
        Some(self.entries[index].key.as_slice())
    }

    /// The entry returned by the last successful `advance`.
    pub(crate) fn entry(&self) -> MergeResult<&Entry> {
        self.current
            .and_then(|i| self.entries.get(i))
            .ok_or(MergeError::NotPositioned)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
