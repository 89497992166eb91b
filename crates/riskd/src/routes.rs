//! API routes for riskd

use crate::error::RiskError;
use crate::middleware::{require_access_token, AccessGate};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use risk_shared::{compute_risk, AnalyzeRequest, AnalyzeResponse, HEALTH_STATUS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, Instrument};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Analysis Routes
// ============================================================================

/// `POST /analyze_gameplay`, behind the access gate
pub fn analysis_routes(gate: AccessGate) -> Router<AppStateArc> {
    Router::new()
        .route("/analyze_gameplay", post(analyze_gameplay))
        .route_layer(middleware::from_fn_with_state(gate, require_access_token))
}

async fn analyze_gameplay(
    State(state): State<AppStateArc>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, RiskError> {
    let span = tracing::info_span!("analyze", request_id = %uuid::Uuid::new_v4());

    async move {
        let Json(request) = payload.map_err(|rejection| {
            error!("Rejected gameplay payload: {}", rejection.body_text());
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RiskError::PayloadTooLarge
            } else {
                RiskError::InvalidRequest(rejection.body_text())
            }
        })?;
        debug!("Received gameplay metrics: {:?}", request.metrics);

        let score = compute_risk(&request.metrics);
        info!("Scored game: {} ({})", score.risk_score, score.risk_profile);

        let assessment = state
            .narrative
            .build(&request.metrics, score)
            .await
            .map_err(|e| {
                error!("Error in analyze_gameplay: {}", e);
                e
            })?;

        Ok::<_, RiskError>(Json(AnalyzeResponse::success(assessment)))
    }
    .instrument(span)
    .await
}

// ============================================================================
// Health Routes
// ============================================================================

/// Fixed liveness acknowledgment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
        service: "riskd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
