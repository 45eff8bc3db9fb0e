use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::PaginatedResponse,
    leaderboard::{LeaderboardEntryResponse, LeaderboardFilter, RebuildRequest},
};
use storage::services::leaderboard::RebuildSummary;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/leaderboard",
    params(
        ("league_id" = Uuid, Path, description = "League id"),
        LeaderboardFilter
    ),
    responses(
        (status = 200, description = "Leaderboard for the scope", body = PaginatedResponse<LeaderboardEntryResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboards"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
    Query(filter): Query<LeaderboardFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let entries =
        services::get_leaderboard(state.db.pool(), league_id, filter.season_id).await?;
    let total_items = entries.len() as i64;

    let data: Vec<LeaderboardEntryResponse> = entries
        .into_iter()
        .enumerate()
        .skip(filter.offset() as usize)
        .take(filter.limit() as usize)
        .map(|(i, entry)| LeaderboardEntryResponse::from_entry(i + 1, entry))
        .collect();

    let response = PaginatedResponse::new(data, filter.page, filter.page_size, total_items);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leagues/{league_id}/leaderboard/rebuild",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    request_body = RebuildRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Scope rebuilt from scratch", body = RebuildSummary),
        (status = 403, description = "Not a league member"),
        (status = 412, description = "A listed round has not been revealed")
    ),
    tag = "leaderboards"
)]
pub async fn rebuild_leaderboard(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
    Json(req): Json<RebuildRequest>,
) -> Result<Response, WebError> {
    let summary = services::rebuild(
        state.db.pool(),
        league_id,
        req.season_id,
        req.round_ids,
        req.acting_user_id,
    )
    .await?;

    Ok(Json(summary).into_response())
}
