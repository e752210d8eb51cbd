use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Published sites are public and read-only.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}
