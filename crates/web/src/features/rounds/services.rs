use catalog::GenreLookup;
use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::round::{CreateRoundRequest, CreateSubmissionRequest},
    dto::vote::VoteBatchRequest,
    error::{DomainError, DomainResult},
    models::{Round, RoundStatus, Submission},
    repository::round::RoundRepository,
    repository::submission::SubmissionRepository,
    repository::vote::VoteRepository,
    services::hooks::RevealHooks,
    services::round_lifecycle::{self, TransitionOutcome},
    services::scoring::{self, RoundResult},
    services::{membership, voting},
};
use uuid::Uuid;

/// Create a round in `draft`
pub async fn create_round(
    pool: &PgPool,
    league_id: Uuid,
    req: &CreateRoundRequest,
) -> DomainResult<Round> {
    membership::require_member(pool, league_id, req.created_by).await?;

    let round = RoundRepository::new(pool).create(league_id, req).await?;
    Ok(round)
}

pub async fn get_round(pool: &PgPool, round_id: Uuid) -> DomainResult<Round> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    Ok(round)
}

pub async fn list_rounds(pool: &PgPool, league_id: Uuid) -> DomainResult<Vec<Round>> {
    let rounds = RoundRepository::new(pool).list_by_league(league_id).await?;
    Ok(rounds)
}

/// Enter a track into a round that is currently accepting submissions.
pub async fn create_submission(
    pool: &PgPool,
    round_id: Uuid,
    req: &CreateSubmissionRequest,
) -> DomainResult<Submission> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    membership::require_member(pool, round.league_id, req.user_id).await?;

    if round.status != RoundStatus::Submitting {
        return Err(DomainError::InvalidState {
            status: round.status,
        });
    }

    let now = Utc::now();
    if let Some(starts_at) = round.submission_starts_at
        && now < starts_at
    {
        return Err(DomainError::PreconditionFailed(
            "submission window has not opened".to_string(),
        ));
    }
    if let Some(ends_at) = round.submission_ends_at
        && now > ends_at
    {
        return Err(DomainError::PreconditionFailed(
            "submission window has closed".to_string(),
        ));
    }

    let submission = SubmissionRepository::new(pool).create(round_id, req).await?;
    Ok(submission)
}

/// Move a round to its next status, running the reveal pipeline when it
/// enters `revealed`.
pub async fn transition(
    pool: &PgPool,
    hooks: &dyn RevealHooks,
    lookup: &dyn GenreLookup,
    round_id: Uuid,
    target: RoundStatus,
    acting_user_id: Uuid,
) -> DomainResult<TransitionOutcome> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    membership::require_member(pool, round.league_id, acting_user_id).await?;

    round_lifecycle::transition(pool, hooks, lookup, round_id, target).await
}

/// Cancel a round that never reached voting.
pub async fn cancel(pool: &PgPool, round_id: Uuid, acting_user_id: Uuid) -> DomainResult<()> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    membership::require_member(pool, round.league_id, acting_user_id).await?;

    round_lifecycle::cancel(pool, round_id).await
}

/// Ranked results for a round, using the same ordering as winner
/// determination and placement statistics.
pub async fn results(pool: &PgPool, round_id: Uuid) -> DomainResult<RoundResult> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    let submissions = SubmissionRepository::new(pool).list_by_round(round_id).await?;
    let votes = VoteRepository::new(pool).list_by_round(round_id).await?;

    Ok(scoring::score_round(round.round_id, &submissions, &votes))
}

/// Validate and atomically replace the voter's batch for a round.
pub async fn submit_votes(
    pool: &PgPool,
    round_id: Uuid,
    req: &VoteBatchRequest,
) -> DomainResult<()> {
    voting::submit_vote_batch(pool, round_id, req).await
}
