//! # condo-projection - Financial Projections for Condominium Buildings
//!
//! **Month-by-month income and expense projections** computed from a
//! building's bills and residences, plus the result cache that keeps
//! repeated requests cheap.
//!
//! ## Overview
//!
//! A projection expands every bill's recurrence schedule over a date range,
//! adds the monthly fees of active residences as income, and returns one
//! [`FinancialRecord`] per month (or per year) with a [`ProjectionSummary`].
//!
//! ## Core Concepts
//!
//! ### 1. Schedules and income
//!
//! - [`schedule::charge_amount`] - What a bill charges in a given month
//! - [`income::monthly_income`] - Fees contributed by active residences
//!
//! ### 2. Building projections
//!
//! [`ProjectionBuilder`] loads records through a [`FinancialSource`] and folds
//! them into a [`Projection`]. [`project`] is the pure core, usable without a
//! source.
//!
//! ### 3. Result cache
//!
//! [`CacheStore`] stores serialized projections keyed by building and
//! `projection:{start}:{end}:{group_by}`. Entries expire after a TTL; expired
//! entries are never returned and are swept in the background by
//! [`spawn_sweeper`]. Backends implement [`CacheBackend`];
//! [`MemoryCacheBackend`] is the in-process one.
//!
//! ### 4. Serving
//!
//! - [`ProjectionService`] - Cache-or-compute, with concurrent misses collapsed
//!   by [`SingleFlight`]
//! - [`CacheInvalidator`] - Drops a building's entries when its records change
//! - [`SummaryCoordinator`] - One-year summaries over many buildings, with
//!   partial failures reported per building
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use condo_projection::{
//!     Bill, CacheStore, DateRange, GroupBy, InMemoryFinancialSource, ProjectionService,
//!     Recurrence, Residence,
//! };
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> condo_projection::Result<()> {
//! let source = Arc::new(InMemoryFinancialSource::new());
//! source.add_building("bld-1", "Le Carré");
//! source.add_bill(Bill::new(
//!     "ins-1",
//!     "bld-1",
//!     "insurance",
//!     "6000",
//!     Recurrence::Yearly,
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//! ));
//! source.add_residence(Residence::new("r-101", "bld-1", Some("1800"), true));
//!
//! let store = Arc::new(CacheStore::in_memory(Duration::from_secs(3600)));
//! let service = ProjectionService::new(source, store);
//!
//! let range = DateRange::years(2024, 2026).unwrap();
//! let outcome = service.projection("bld-1", range, GroupBy::Yearly, false).await?;
//! println!("net: {}", outcome.projection.summary.net_cash_flow);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cache;
pub mod coordinator;
pub mod error;
pub mod income;
pub mod invalidator;
pub mod model;
pub mod schedule;
pub mod service;
pub mod singleflight;
pub mod source;

pub use builder::{fold_yearly, project, ProjectionBuilder};
pub use cache::{
    spawn_sweeper, CacheBackend, CacheEntry, CacheKey, CacheStats, CacheStore, Clock, ManualClock,
    MemoryCacheBackend, SystemClock,
};
pub use coordinator::{
    BuildingFailure, BuildingSummary, MultiBuildingSummary, SummaryCoordinator, DEFAULT_MAX_BUILDINGS,
};
pub use error::{ProjectionError, Result};
pub use income::{monthly_income, IncomeBreakdown};
pub use invalidator::{CacheInvalidator, ChangeEvent};
pub use model::{
    parse_amount, Bill, DateRange, FinancialRecord, GroupBy, Projection, ProjectionSummary,
    Recurrence, Residence, MONTHLY_FEES_CATEGORY,
};
pub use service::{ProjectionOutcome, ProjectionService};
pub use singleflight::SingleFlight;
pub use source::{BuildingInfo, FinancialSource, InMemoryFinancialSource};
