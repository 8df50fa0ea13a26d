//! Axum Handlers
//!
//! The assistant endpoint and a liveness probe. Every failure of a turn is
//! collapsed into one `500 {error, details}` response.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;
use ventanilla_core::turn::TurnError;

use crate::{
    models::{AssistantRequest, AssistantResponse, ErrorResponse, HealthResponse},
    state::AppState,
};

pub enum ApiError {
    MalformedBody(serde_json::Error),
    Turn(TurnError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            ApiError::MalformedBody(err) => {
                error!(error = %err, "Rejected malformed request body");
                format!("Malformed request body: {}", err)
            }
            ApiError::Turn(err) => {
                error!(failed_at = %err.stage(), error = ?err, "Assistant turn failed");
                err.to_string()
            }
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Error al procesar la solicitud".to_string(),
                details,
            }),
        )
            .into_response()
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        Self::Turn(err)
    }
}

/// Run one assistant turn: transcribe, generate and synthesize.
#[utoipa::path(
    post,
    path = "/api/assistant",
    request_body = AssistantRequest,
    responses(
        (status = 200, description = "Reply text and synthesized audio", body = AssistantResponse),
        (status = 500, description = "The turn failed", body = ErrorResponse)
    )
)]
pub async fn assistant(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AssistantResponse>, ApiError> {
    // Parsed by hand so that malformed JSON gets the same error shape as any
    // other failure.
    let payload: AssistantRequest =
        serde_json::from_slice(&body).map_err(ApiError::MalformedBody)?;

    let reply = state.turns.run(payload.into()).await?;
    Ok(Json(reply.into()))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "The service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
