//! CORS middleware configuration

use tower_http::cors::CorsLayer;

/// Permissive CORS for the back-office front end
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
