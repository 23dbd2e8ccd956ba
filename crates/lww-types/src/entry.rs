use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// One record of a source sequence fed into a merge pass.
///
/// `timestamp` is the logical write time of `value`. [`Timestamp::ZERO`]
/// means the source has no timestamp for this record (for example a scan of
/// a store that was never timestamp-aware) and the merge pass should assign
/// its default timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: Timestamp,
}

impl Entry {
    /// Create an entry with an explicit timestamp.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// Create an entry that carries no timestamp of its own.
    pub fn untimestamped(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, value, Timestamp::ZERO)
    }

    /// Returns `true` if the entry relies on the pass default timestamp.
    pub fn has_timestamp(&self) -> bool {
        !self.timestamp.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_copies_key_and_value() {
        let entry = Entry::new("k", b"v".as_slice(), Timestamp::from_nanos(9));
        assert_eq!(entry.key, b"k");
        assert_eq!(entry.value, b"v");
        assert!(entry.has_timestamp());
    }

    #[test]
    fn untimestamped_has_zero_timestamp() {
        let entry = Entry::untimestamped("k", "v");
        assert_eq!(entry.timestamp, Timestamp::ZERO);
        assert!(!entry.has_timestamp());
    }
}
