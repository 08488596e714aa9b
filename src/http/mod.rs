//! The thin developer-scope / agent-scope axum surface (`spec.md` §6).
//!
//! Grounded on this crate's own [`state`]/[`error`]/[`auth`] modules (no
//! axum router survives in the retrieval pack to imitate directly — the
//! teacher and every sibling example ship no HTTP layer at all) and written
//! to axum 0.7's standard `Router`/`State` idiom, which is exactly what
//! `Cargo.toml` already carries `axum` and `tower-http` for.
//!
//! Two router trees are nested under one `axum::Router<AppState>`:
//! developer scope (`/cluster/v1/*`) and agent scope
//! (`/sessions/v1/{sessionId}/{memories|knowledge}`), plus the
//! unauthenticated `/health` path.

pub mod auth;
pub mod error;
pub mod handlers;
mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
