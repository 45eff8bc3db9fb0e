use axum::{Router, routing::get};

use crate::state::AppState;

use super::handlers::get_user_statistics;

/// Routes mounted under /api/leagues/{league_id}/users.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/:user_id/statistics", get(get_user_statistics))
}
