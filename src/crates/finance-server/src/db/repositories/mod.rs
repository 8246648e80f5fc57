//! Repository pattern implementations for database access

pub mod bill_repo;
pub mod building_repo;
pub mod cache_repo;
pub mod residence_repo;

pub use bill_repo::BillRepository;
pub use building_repo::BuildingRepository;
pub use cache_repo::{CacheRepository, CacheRowStats};
pub use residence_repo::ResidenceRepository;
