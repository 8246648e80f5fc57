//! API request handlers
//!
//! Provides handler functions for all API endpoints organized by resource.

pub mod bills;
pub mod buildings;
pub mod cache_admin;
pub mod health;
pub mod projections;
pub mod residences;
pub mod summary;

pub use bills::{create_bill, delete_bill, get_bill, list_bills, update_bill};
pub use buildings::{create_building, delete_building, get_building, list_buildings, update_building};
pub use cache_admin::{cache_stats, sweep_cache};
pub use health::{health, health_detailed};
pub use projections::{get_projection, invalidate_projection_cache, refresh_projection};
pub use residences::{
    create_residence, delete_residence, get_residence, list_residences, update_residence,
};
pub use summary::financial_summary;
