//! Value header codec for timestamp-aware stores.
//!
//! Every value held by a timestamp-aware store has the wire form
//! `[8 bytes big-endian u64 timestamp][0..N bytes payload]`. The layout must
//! be bit-exact across replicas.
//!
//! - A value of exactly [`HEADER_SIZE`] bytes is a tombstone.
//! - A value shorter than [`HEADER_SIZE`] is corrupt.

pub mod error;
pub mod header;

pub use error::{CodecError, CodecResult};
pub use header::{decode, encode_to_vec, is_tombstone, HeaderCodec, HEADER_SIZE};
