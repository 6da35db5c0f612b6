// [apps/server/src/middleware.rs]
//! Cross-cutting HTTP concerns. Authentication is handled per-handler by
//! the `AuthenticatedPrincipal` extractor (libs/auth), so the only thing
//! left at this layer is CORS.

use std::time::Duration;

use axum::http::{header, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer for the public API. With no configured origin,
/// falls back to permissive `Any` — appropriate for local development,
/// tightened by setting `CORS_ALLOWED_ORIGIN` in any shared environment.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(origin.parse().expect("CORS_ALLOWED_ORIGIN must be a valid header value")),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
