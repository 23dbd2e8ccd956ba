use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Logical write time of a value, in nanoseconds since the UNIX epoch.
///
/// A scalar timestamp is the only ordering signal used for conflict
/// resolution; there is no logical counter or node component. The zero
/// value means "no explicit timestamp" and is never stored in a value
/// header by a correctly configured merge pass.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The unset timestamp.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Largest representable timestamp.
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Width of the big-endian wire form.
    pub const SIZE: usize = 8;

    /// Create a timestamp from raw nanoseconds.
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Raw nanoseconds since the UNIX epoch.
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Timestamp for the current wall-clock time.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Returns `true` if no timestamp is set.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `self` if set, otherwise `fallback`.
    pub fn or(self, fallback: Timestamp) -> Timestamp {
        if self.is_zero() {
            fallback
        } else {
            self
        }
    }

    /// Big-endian wire form.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Parse the big-endian wire form.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    /// Parse the big-endian wire form. The slice must be exactly 8 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: Self::SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(u64::from_be_bytes(raw)))
    }
}

impl From<u64> for Timestamp {
    fn from(nanos: u64) -> Self {
        Self(nanos)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
