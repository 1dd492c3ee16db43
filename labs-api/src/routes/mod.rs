//! REST API Routes Module
//!
//! Includes:
//! - Market insights and invalidity endpoints
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI document and Swagger UI
//! - CORS support for browser-based clients
//! - Request tracing

pub mod health;
pub mod insights;
pub mod invalid;

use std::time::Duration;

use axum::{
    http::{header, request, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

pub use health::create_router as health_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - `/market-insights`, `/market-invalid`, `/question-invalid`
/// - `/ping/` and `/health/*` probes
/// - `/openapi.json` (openapi feature) and `/swagger-ui` (swagger-ui feature)
///
/// Layers, outermost first: CORS, request tracing.
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    let health = health::create_router(state.store.clone(), state.start_time);

    #[allow(unused_mut)]
    let mut router = Router::new()
        .route("/ping/", get(health::legacy_ping))
        .route("/market-insights", get(insights::get_market_insights))
        .route("/market-invalid", get(invalid::get_market_invalid))
        .route("/question-invalid", get(invalid::get_question_invalid))
        .with_state(state)
        .nest("/health", health);

    #[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    // Swagger UI serves /openapi.json itself.
    #[cfg(feature = "swagger-ui")]
    {
        use crate::openapi::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router =
            router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(build_cors_layer(config))
            .layer(TraceLayer::new_for_http()),
    )
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// With no configured origins every origin is allowed; otherwise only
/// origins matching the list, `*.domain` entries included.
pub fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let allowed = config.clone();
        let origins = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &request::Parts| {
            origin
                .to_str()
                .map(|origin| allowed.is_origin_allowed(origin))
                .unwrap_or(false)
        });

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}
