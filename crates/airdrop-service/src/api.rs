//! Claim API Endpoints
//!
//! REST surface over the loaded distributions, for the claim UI: health,
//! per-network summaries, and per-address claim lookup.

use crate::state::{AppState, NetworkSummary};
use alloy::primitives::B256;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use distribution_gen::ClaimRecord;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Run the API server
pub async fn run_server(listen: String, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!(address = %listen, "Claim API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/networks", get(networks))
        .route("/claims/{network}/{address}", get(get_claim))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    networks_loaded: usize,
    uptime_secs: u64,
    last_error: Option<String>,
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let loaded = state.network_count();
    let status_code = if loaded > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if loaded > 0 { "healthy" } else { "empty" },
        networks_loaded: loaded,
        uptime_secs: state.uptime_secs(),
        last_error: state.last_error(),
    };

    (status_code, Json(response))
}

/// Per-network distribution summaries
async fn networks(State(state): State<AppState>) -> Json<Vec<NetworkSummary>> {
    Json(state.network_summaries())
}

/// Claim response: record plus the root to verify against
#[derive(Serialize)]
struct ClaimResponse {
    network: String,
    address: String,
    merkle_root: B256,
    #[serde(flatten)]
    claim: ClaimRecord,
}

/// Per-address claim lookup
async fn get_claim(
    State(state): State<AppState>,
    Path((network, address)): Path<(String, String)>,
) -> Result<Json<ClaimResponse>, StatusCode> {
    let bundle = state
        .distribution(&network)
        .ok_or(StatusCode::NOT_FOUND)?;

    let claim = bundle.claim(&address).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ClaimResponse {
        network,
        address: address.to_ascii_lowercase(),
        merkle_root: bundle.merkle_root,
        claim: claim.clone(),
    }))
}
