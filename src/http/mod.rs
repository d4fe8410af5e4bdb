//! The HTTP control plane (C8): a thin `axum` adapter from request/response
//! bodies onto the registry (C5) and the two sink pools (C6/C7). Carries no
//! logic of its own beyond request validation and status code mapping.

mod dto;
mod error;
mod handlers;
mod state;

pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;

/// Builds the full router: `/generator/{add,remove,status}` plus the
/// ambient `/healthz` liveness probe (present in the original, not part of
/// C1-C7's functional surface).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generator/add", post(handlers::add_generator))
        .route("/generator/remove", post(handlers::remove_generator))
        .route("/generator/status", get(handlers::generator_status))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
