//! `GET /health` (`spec.md` §6): verifies both stores are reachable.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::graph::ports::GraphStore as _;
use crate::history::ports::HistoryRepository as _;
use crate::http::error::ApiError;
use crate::http::state::AppState;

/// Per-store reachability, returned alongside the overall `status`.
#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    postgres: &'static str,
    graph: &'static str,
}

/// Checks relational and graph store connectivity.
///
/// # Errors
///
/// Returns [`ApiError::StoreUnavailable`] if either store cannot be reached.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthBody>, ApiError> {
    state.history.health_check().await?;
    state.graph.health_check().await?;
    Ok(Json(HealthBody { status: "ok", postgres: "ok", graph: "ok" }))
}
