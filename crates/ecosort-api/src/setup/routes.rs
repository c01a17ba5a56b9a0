//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use crate::utils::upload::inline_body_limit;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use ecosort_core::Config;
use ecosort_infra::{request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let api_cors = setup_cors(config)?;
    let uploads_cors = setup_uploads_cors(config)?;

    // The JSON form carries base64, so the limit must cover the encoded size.
    let body_limit = usize::try_from(inline_body_limit(config.max_file_size_bytes))
        .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .route(
            "/api/ml/predict",
            post(handlers::predict::predict).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/health", get(handlers::health::health))
        .route("/api/health/deep", get(handlers::health::deep_health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(api_cors);

    let upload_routes = Router::new()
        .route("/uploads/{*path}", get(handlers::uploads::serve_upload))
        .layer(uploads_cors);

    let app = api_routes
        .merge(upload_routes)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Files under `/uploads` are fetched by the deployed client with credentials.
fn setup_uploads_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origin = config
        .client_url
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid CLIENT_URL '{}': {}", config.client_url, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
