//! Foundation types for last-writer-wins replication.
//!
//! Every other `lww-*` crate depends on `lww-types`.
//!
//! # Key Types
//!
//! - [`Timestamp`] — Nanosecond write time; zero means "not set"
//! - [`Entry`] — One `(key, value, timestamp)` record of a source sequence
//! - [`display_ascii`] — Safe printable rendering of arbitrary bytes

pub mod display;
pub mod entry;
pub mod error;
pub mod timestamp;

pub use display::{display_ascii, round_millis};
pub use entry::Entry;
pub use error::TypeError;
pub use timestamp::Timestamp;
