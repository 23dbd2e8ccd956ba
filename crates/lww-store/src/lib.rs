//! Ordered key-value storage for LWW merge passes.
//!
//! A merge pass reads the destination's current raw value for a key, decides
//! the value it should hold, and writes or deletes it. The store never
//! interprets values: timestamp headers are opaque bytes at this layer.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Scans return keys in ascending byte-wise order.
//! 2. A write is visible to subsequent reads within the same pass.
//! 3. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use traits::{KvPair, KvStore};
