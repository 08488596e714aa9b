//! Wires the handler tree into one `axum::Router<AppState>` (`spec.md` §6).

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{agent_scope, cluster, health};
use crate::http::state::AppState;

/// Builds the full HTTP surface for the given application state.
///
/// Developer-scope resources live under `/cluster/v1`, agent-scope memory
/// and knowledge operations under `/sessions/v1/:session_id`, and an
/// unauthenticated health check at `/health`.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cluster_routes = Router::new()
        .route("/users", post(cluster::users::create).get(cluster::users::list))
        .route(
            "/users/:id",
            get(cluster::users::get).put(cluster::users::update).delete(cluster::users::delete),
        )
        .route("/agents", post(cluster::agents::create).get(cluster::agents::list))
        .route(
            "/agents/:id",
            get(cluster::agents::get).put(cluster::agents::update).delete(cluster::agents::delete),
        )
        .route("/agent-groups", post(cluster::agent_groups::create).get(cluster::agent_groups::list))
        .route(
            "/agent-groups/:id",
            get(cluster::agent_groups::get)
                .put(cluster::agent_groups::update)
                .delete(cluster::agent_groups::delete),
        )
        .route("/session-types", post(cluster::session_types::create).get(cluster::session_types::list))
        .route(
            "/session-types/:id",
            get(cluster::session_types::get)
                .put(cluster::session_types::update)
                .delete(cluster::session_types::delete),
        )
        .route("/sessions", post(cluster::sessions::create).get(cluster::sessions::list))
        .route(
            "/sessions/:id",
            get(cluster::sessions::get).put(cluster::sessions::update).delete(cluster::sessions::delete),
        )
        .route("/monitoring/agents/:id", get(cluster::monitoring::agent))
        .route("/monitoring/sessions/:id", get(cluster::monitoring::session));

    let agent_routes = Router::new()
        .route(
            "/:session_id/memories",
            get(agent_scope::memories::list).post(agent_scope::memories::create).delete(agent_scope::memories::delete),
        )
        .route("/:session_id/memories/search", get(agent_scope::memories::search))
        .route(
            "/:session_id/knowledge",
            get(agent_scope::knowledge::list)
                .post(agent_scope::knowledge::upsert)
                .put(agent_scope::knowledge::upsert)
                .delete(agent_scope::knowledge::delete),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/cluster/v1", cluster_routes)
        .nest("/sessions/v1", agent_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
