use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::round::{
    CancelRequest, CreateRoundRequest, CreateSubmissionRequest, RoundResponse,
    RoundResultsResponse, SubmissionResponse, TransitionRequest, TransitionResponse,
};
use storage::dto::vote::VoteBatchRequest;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/leagues/{league_id}/rounds",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    request_body = CreateRoundRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Round created in draft", body = RoundResponse),
        (status = 403, description = "Not a league member"),
        (status = 404, description = "League not found")
    ),
    tag = "rounds"
)]
pub async fn create_round(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
    Json(req): Json<CreateRoundRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let round = services::create_round(state.db.pool(), league_id, &req).await?;

    Ok((StatusCode::CREATED, Json(RoundResponse::from(round))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/rounds",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    responses(
        (status = 200, description = "Rounds of the league", body = Vec<RoundResponse>)
    ),
    tag = "rounds"
)]
pub async fn list_rounds(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let rounds = services::list_rounds(state.db.pool(), league_id).await?;

    let response: Vec<RoundResponse> = rounds.into_iter().map(RoundResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    responses(
        (status = 200, description = "Round found", body = RoundResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn get_round(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let round = services::get_round(state.db.pool(), round_id).await?;

    Ok(Json(RoundResponse::from(round)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/submissions",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    request_body = CreateSubmissionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 409, description = "Round not accepting submissions, or user already submitted"),
        (status = 412, description = "Submission window closed")
    ),
    tag = "rounds"
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let submission = services::create_submission(state.db.pool(), round_id, &req).await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/transition",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    request_body = TransitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Round transitioned; reveal warnings, if any, are included", body = TransitionResponse),
        (status = 403, description = "Not a league member"),
        (status = 409, description = "Not the allowed successor status")
    ),
    tag = "rounds"
)]
pub async fn transition_round(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Response, WebError> {
    let outcome = services::transition(
        state.db.pool(),
        state.hooks.as_ref(),
        state.catalog.as_ref(),
        round_id,
        req.target,
        req.acting_user_id,
    )
    .await?;

    Ok(Json(TransitionResponse::from(outcome)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/cancel",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    request_body = CancelRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Round and its submissions deleted"),
        (status = 409, description = "Round already past submitting")
    ),
    tag = "rounds"
)]
pub async fn cancel_round(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    Json(req): Json<CancelRequest>,
) -> Result<Response, WebError> {
    services::cancel(state.db.pool(), round_id, req.acting_user_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/results",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    responses(
        (status = 200, description = "Ranked results", body = RoundResultsResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn round_results(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let result = services::results(state.db.pool(), round_id).await?;

    Ok(Json(RoundResultsResponse::from(result)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rounds/{round_id}/votes",
    params(
        ("round_id" = Uuid, Path, description = "Round id")
    ),
    request_body = VoteBatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Vote batch replaced"),
        (status = 400, description = "Batch violates the voting rules"),
        (status = 403, description = "Not a league member"),
        (status = 409, description = "Round not in voting"),
        (status = 412, description = "Voting deadline passed")
    ),
    tag = "rounds"
)]
pub async fn submit_votes(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    Json(req): Json<VoteBatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::submit_votes(state.db.pool(), round_id, &req).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
