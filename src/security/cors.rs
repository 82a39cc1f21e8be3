//! Cross-origin resource sharing.

use tower_http::cors::CorsLayer;

/// Any origin, method and header. The API is read-only and unauthenticated.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
