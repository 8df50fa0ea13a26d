//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application: the
//! assistant endpoint, the health probe, the cross-origin policy and the
//! OpenAPI documentation.

use crate::{
    handlers,
    models::{AssistantRequest, AssistantResponse, ErrorResponse, HealthResponse},
    state::AppState,
};

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::assistant, handlers::health),
    components(schemas(AssistantRequest, AssistantResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "Ventanilla API", description = "Voice and text practice assistant for citizen-service staff")
    )
)]
pub struct ApiDoc;

/// Any origin may post turns; preflight requests are answered by this layer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/assistant", post(handlers::assistant))
        .route("/health", get(handlers::health))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .layer(cors_layer())
}
