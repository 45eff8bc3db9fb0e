use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::stats::{StatisticsFilter, UserStatisticsResponse};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/users/{user_id}/statistics",
    params(
        ("league_id" = Uuid, Path, description = "League id"),
        ("user_id" = Uuid, Path, description = "User id"),
        StatisticsFilter
    ),
    responses(
        (status = 200, description = "Statistics for the user in this scope", body = UserStatisticsResponse),
        (status = 404, description = "No statistics recorded for this user")
    ),
    tag = "statistics"
)]
pub async fn get_user_statistics(
    State(state): State<AppState>,
    Path((league_id, user_id)): Path<(Uuid, Uuid)>,
    Query(filter): Query<StatisticsFilter>,
) -> Result<Response, WebError> {
    let response =
        services::get_user_statistics(state.db.pool(), league_id, filter.season_id, user_id)
            .await?;

    Ok(Json(response).into_response())
}
