//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ecosort API",
        version = "0.1.0",
        description = "Waste image classification with coin rewards. Images are forwarded to an external classifier and deleted once classified."
    ),
    paths(
        handlers::predict::predict,
        handlers::health::health,
        handlers::health::deep_health,
    ),
    components(schemas(
        handlers::predict::PredictResponse,
        handlers::health::HealthResponse,
        handlers::health::DeepHealthResponse,
        ecosort_infra::ErrorResponse,
    )),
    tags(
        (name = "classification", description = "Waste classification and rewards"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
