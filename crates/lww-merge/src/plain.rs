//! Merge into a header-free store.
//!
//! The source is a timestamp-resolved store whose headers have already been
//! stripped and whose tombstones have been dropped. That store is
//! authoritative, so no conflict resolution happens on this leg.

use lww_types::Entry;

use crate::error::MergeResult;
use crate::iterator::{Cursor, MergeIterator};

/// Merge iterator that copies payloads verbatim and deletes missing keys.
#[derive(Debug)]
pub struct PlainIterator {
    cursor: Cursor,
}

impl PlainIterator {
    /// Create an iterator over `entries`, which must be sorted by key in
    /// strictly ascending byte order.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            cursor: Cursor::new(entries),
        }
    }

    /// Number of entries in the source sequence.
    pub fn entry_count(&self) -> usize {
        self.cursor.len()
    }
}

impl MergeIterator for PlainIterator {
    fn advance(&mut self) -> Option<&[u8]> {
        self.cursor.advance()
    }

    fn decide<'a>(&'a mut self, _current: &'a [u8]) -> MergeResult<&'a [u8]> {
        Ok(self.cursor.entry()?.value.as_slice())
    }

    fn reconcile<'a>(&'a mut self, _current: &'a [u8]) -> MergeResult<Option<&'a [u8]>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use lww_types::Timestamp;

    #[test]
    fn decide_returns_payload_regardless_of_destination() {
        let mut it = PlainIterator::new(vec![Entry::new("k", "fresh", Timestamp::from_nanos(5))]);
        assert_eq!(it.advance(), Some(b"k".as_slice()));
        assert_eq!(it.decide(b"anything").unwrap(), b"fresh");
        assert_eq!(it.decide(b"").unwrap(), b"fresh");
    }

    #[test]
    fn empty_payload_is_written_as_empty() {
        let mut it = PlainIterator::new(vec![Entry::untimestamped("k", "")]);
        it.advance();
        assert_eq!(it.decide(b"old").unwrap(), b"");
    }

    #[test]
    fn reconcile_deletes() {
        let mut it = PlainIterator::new(Vec::new());
        assert_eq!(it.reconcile(b"old").unwrap(), None);
    }

    #[test]
    fn decide_before_advance_is_rejected() {
        let mut it = PlainIterator::new(vec![Entry::untimestamped("k", "v")]);
        assert_eq!(it.entry_count(), 1);
        assert!(matches!(it.decide(b""), Err(MergeError::NotPositioned)));
    }
}
