use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::handlers::{get_leaderboard, rebuild_leaderboard};

/// Routes mounted under /api/leagues/{league_id}/leaderboard.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/", get(get_leaderboard))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/rebuild", post(rebuild_leaderboard))
}
