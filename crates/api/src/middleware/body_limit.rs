use tower_http::limit::RequestBodyLimitLayer;

/// Every route is read-only; anything bigger than this is not a real request.
pub const MAX_REQUEST_BODY: usize = 64 * 1024;

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_REQUEST_BODY)
}
