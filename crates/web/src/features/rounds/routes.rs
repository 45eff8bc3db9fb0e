use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::handlers::{
    cancel_round, create_round, create_submission, get_round, list_rounds, round_results,
    submit_votes, transition_round,
};

/// Routes mounted under /api/leagues/{league_id}/rounds.
pub fn league_public_routes() -> Router<AppState> {
    Router::new().route("/", get(list_rounds))
}

pub fn league_protected_routes() -> Router<AppState> {
    Router::new().route("/", post(create_round))
}

/// Routes mounted under /api/rounds.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/:round_id", get(get_round))
        .route("/:round_id/results", get(round_results))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/:round_id/submissions", post(create_submission))
        .route("/:round_id/transition", post(transition_round))
        .route("/:round_id/cancel", post(cancel_round))
        .route("/:round_id/votes", put(submit_votes))
}
