//! Projection result cache
//!
//! Cached projections are addressed by building and [`CacheKey`]. The
//! [`CacheStore`] adds TTL handling on top of a pluggable
//! [`CacheBackend`]; [`MemoryCacheBackend`] is the in-process backend and
//! the server crate persists entries in SQLite.

pub mod key;
pub mod memory;
pub mod store;
pub mod traits;

pub use key::CacheKey;
pub use memory::MemoryCacheBackend;
pub use store::{spawn_sweeper, CacheStore};
pub use traits::{CacheBackend, CacheEntry, CacheStats, Clock, ManualClock, SystemClock};
