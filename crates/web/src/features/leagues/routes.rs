use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::handlers::{add_member, create_league, create_season, get_league, list_leagues};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leagues))
        .route("/:league_id", get(get_league))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_league))
        .route("/:league_id/members", post(add_member))
        .route("/:league_id/seasons", post(create_season))
}
