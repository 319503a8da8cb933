use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Headers the hosted backend's client library sends with function calls
const CLIENT_INFO_HEADER: HeaderName = HeaderName::from_static("x-client-info");
const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");

/// Permissive CORS: any origin, plus the auth and content-type headers clients send.
///
/// Preflight `OPTIONS` requests are answered by this layer directly.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            CLIENT_INFO_HEADER,
            API_KEY_HEADER,
            header::CONTENT_TYPE,
        ])
}

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/identify-movie", post(handlers::identify_movie))
        // Path used by the hosted backend's functions client
        .route("/functions/v1/identify-movie", post(handlers::identify_movie))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}
