use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::league::{
    AddMemberRequest, CreateLeagueRequest, CreateSeasonRequest, LeagueResponse, MemberResponse,
    SeasonResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leagues",
    responses(
        (status = 200, description = "List all leagues", body = Vec<LeagueResponse>)
    ),
    tag = "leagues"
)]
pub async fn list_leagues(State(state): State<AppState>) -> Result<Response, WebError> {
    let leagues = services::list_leagues(state.db.pool()).await?;

    let response: Vec<LeagueResponse> = leagues.into_iter().map(LeagueResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    responses(
        (status = 200, description = "League found", body = LeagueResponse),
        (status = 404, description = "League not found")
    ),
    tag = "leagues"
)]
pub async fn get_league(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let league = services::get_league(state.db.pool(), league_id).await?;

    Ok(Json(LeagueResponse::from(league)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leagues",
    request_body = CreateLeagueRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "League created", body = LeagueResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leagues"
)]
pub async fn create_league(
    State(state): State<AppState>,
    Json(req): Json<CreateLeagueRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let league = services::create_league(state.db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(LeagueResponse::from(league))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leagues/{league_id}/members",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    request_body = AddMemberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 404, description = "League not found"),
        (status = 409, description = "Already a member")
    ),
    tag = "leagues"
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let member = services::add_member(state.db.pool(), league_id, &req).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leagues/{league_id}/seasons",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    request_body = CreateSeasonRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Season created", body = SeasonResponse),
        (status = 404, description = "League not found"),
        (status = 409, description = "Ordinal already used")
    ),
    tag = "leagues"
)]
pub async fn create_season(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
    Json(req): Json<CreateSeasonRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let season = services::create_season(state.db.pool(), league_id, &req).await?;

    Ok((StatusCode::CREATED, Json(SeasonResponse::from(season))).into_response())
}
