//! Database models
//!
//! All timestamp fields are stored as RFC3339 strings (TEXT in SQLite) and
//! calendar dates as `YYYY-MM-DD` text.

pub mod bill;
pub mod building;
pub mod cache_entry;
pub mod residence;

pub use bill::Bill;
pub use building::Building;
pub use cache_entry::CacheEntryRow;
pub use residence::Residence;
