//! API route definitions
//!
//! Defines all API routes and the shared application state.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use condo_projection::{
    CacheInvalidator, CacheStore, ProjectionService, SummaryCoordinator, SystemClock,
};

use crate::api::{handlers, middleware};
use crate::config::{ProjectionLimits, ServerConfig};
use crate::db::{DatabaseConnection, SqlFinancialSource, SqliteCacheBackend};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub projections: Arc<ProjectionService>,
    pub summaries: Arc<SummaryCoordinator>,
    pub limits: ProjectionLimits,
}

impl AppState {
    /// State backed by the database for both records and the projection cache
    pub fn new(db: DatabaseConnection, config: &ServerConfig) -> Self {
        let store = Arc::new(CacheStore::new(
            Arc::new(SqliteCacheBackend::new(db.clone())),
            Arc::new(SystemClock),
            config.cache.ttl(),
        ));
        Self::with_store(db, store, config.projection)
    }

    /// State reading records from the database and caching in `store`
    pub fn with_store(db: DatabaseConnection, store: Arc<CacheStore>, limits: ProjectionLimits) -> Self {
        let source = Arc::new(SqlFinancialSource::new(db.clone()));
        let projections = Arc::new(ProjectionService::new(source, store));
        let summaries = Arc::new(
            SummaryCoordinator::new(projections.clone()).with_max_buildings(limits.max_summary_buildings),
        );
        Self {
            db,
            projections,
            summaries,
            limits,
        }
    }

    pub fn cache_store(&self) -> &Arc<CacheStore> {
        self.projections.store()
    }

    pub fn invalidator(&self) -> &CacheInvalidator {
        self.projections.invalidator()
    }
}

/// Build the complete API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health))
        .route("/api/v1/system/health", get(handlers::health_detailed))
        // Projection endpoints
        .route(
            "/api/v1/buildings/:id/financial-projection",
            get(handlers::get_projection),
        )
        .route(
            "/api/v1/buildings/:id/financial-projection/refresh",
            post(handlers::refresh_projection),
        )
        .route(
            "/api/v1/buildings/:id/financial-projection/cache",
            axum::routing::delete(handlers::invalidate_projection_cache),
        )
        .route(
            "/api/v1/financial-projection/summary",
            get(handlers::financial_summary),
        )
        // Cache administration
        .route(
            "/api/v1/financial-projection/cache/stats",
            get(handlers::cache_stats),
        )
        .route(
            "/api/v1/financial-projection/cache/sweep",
            post(handlers::sweep_cache),
        )
        // Building endpoints
        .route(
            "/api/v1/buildings",
            post(handlers::create_building).get(handlers::list_buildings),
        )
        .route(
            "/api/v1/buildings/:id",
            get(handlers::get_building)
                .put(handlers::update_building)
                .delete(handlers::delete_building),
        )
        // Bill endpoints
        .route(
            "/api/v1/buildings/:id/bills",
            post(handlers::create_bill).get(handlers::list_bills),
        )
        .route(
            "/api/v1/bills/:id",
            get(handlers::get_bill)
                .put(handlers::update_bill)
                .delete(handlers::delete_bill),
        )
        // Residence endpoints
        .route(
            "/api/v1/buildings/:id/residences",
            post(handlers::create_residence).get(handlers::list_residences),
        )
        .route(
            "/api/v1/residences/:id",
            get(handlers::get_residence)
                .put(handlers::update_residence)
                .delete(handlers::delete_residence),
        )
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(state)
}
