use lww_types::Timestamp;

use crate::error::{CodecError, CodecResult};

/// Size of the timestamp header prepended to every value.
pub const HEADER_SIZE: usize = Timestamp::SIZE;

/// Initial scratch capacity; values grow the buffer as needed.
const SCRATCH_CAPACITY: usize = 1024;

/// Encoder that reuses one scratch buffer across calls.
///
/// The slice returned by [`HeaderCodec::encode`] borrows the scratch buffer
/// and is only valid until the next `encode`. Callers that need to keep a
/// value past that point must copy it.
#[derive(Debug)]
pub struct HeaderCodec {
    buf: Vec<u8>,
}

impl HeaderCodec {
    /// Create a codec with an empty scratch buffer.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(SCRATCH_CAPACITY),
        }
    }

    /// Encode `payload` behind a big-endian `timestamp` header.
    ///
    /// The codec does not reject [`Timestamp::ZERO`]; deciding whether a
    /// timestamp is usable belongs to the caller.
    pub fn encode(&mut self, payload: &[u8], timestamp: Timestamp) -> &[u8] {
        self.buf.clear();
        self.buf.extend_from_slice(&timestamp.to_be_bytes());
        self.buf.extend_from_slice(payload);
        &self.buf
    }
}

impl Default for HeaderCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode into a freshly allocated buffer.
pub fn encode_to_vec(payload: &[u8], timestamp: Timestamp) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Split an encoded value into its timestamp and payload.
///
/// Fails with [`CodecError::ValueTooShort`] if the value cannot hold a
/// header, which signals upstream data corruption.
pub fn decode(value: &[u8]) -> CodecResult<(Timestamp, &[u8])> {
    if value.len() < HEADER_SIZE {
        return Err(CodecError::ValueTooShort {
            len: value.len(),
            min: HEADER_SIZE,
        });
    }
    let (header, payload) = value.split_at(HEADER_SIZE);
    let mut raw = [0u8; HEADER_SIZE];
    raw.copy_from_slice(header);
    Ok((Timestamp::from_be_bytes(raw), payload))
}

/// Returns `true` if the encoded value is a bare header (a deleted key).
pub fn is_tombstone(value: &[u8]) -> bool {
    value.len() == HEADER_SIZE
}
