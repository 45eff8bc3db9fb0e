use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::dto::vote::VoteBatchRequest;
use crate::error::{DomainError, DomainResult, VoteValidationError};
use crate::models::{League, Round, VotingConfig};
use crate::repository::league::LeagueRepository;
use crate::repository::round::RoundRepository;
use crate::repository::submission::SubmissionRepository;
use crate::repository::vote::VoteRepository;
use crate::services::membership;
use crate::services::vote_validation::{self, VoteInput};

/// The round override wins over the league default.
pub fn effective_config(round: &Round, league: &League) -> VotingConfig {
    round
        .voting_override
        .as_ref()
        .map(|json| json.0.clone())
        .unwrap_or_else(|| league.voting_config.0.clone())
}

/// Validate and persist a user's full vote batch for a round. The previous
/// batch is replaced atomically; on any validation failure nothing changes.
pub async fn submit_vote_batch(
    pool: &PgPool,
    round_id: Uuid,
    req: &VoteBatchRequest,
) -> DomainResult<()> {
    let round = RoundRepository::new(pool).find_by_id(round_id).await?;
    let league = LeagueRepository::new(pool)
        .find_by_id(round.league_id)
        .await?;

    membership::require_member(pool, round.league_id, req.voter_id).await?;

    let submissions = SubmissionRepository::new(pool)
        .list_by_round(round_id)
        .await?;
    let round_submission_ids: HashSet<Uuid> =
        submissions.iter().map(|s| s.submission_id).collect();
    let voter_submission_ids: HashSet<Uuid> = submissions
        .iter()
        .filter(|s| s.user_id == req.voter_id)
        .map(|s| s.submission_id)
        .collect();

    let config = effective_config(&round, &league);
    let batch: Vec<VoteInput> = req
        .votes
        .iter()
        .map(|v| VoteInput {
            submission_id: v.submission_id,
            points: v.points,
            kind: v.kind,
        })
        .collect();

    vote_validation::validate_batch(
        &batch,
        &config,
        &round_submission_ids,
        &voter_submission_ids,
    )?;

    match vote_validation::check_round_open(round.status, round.voting_ends_at, Utc::now()) {
        Ok(()) => {}
        Err(VoteValidationError::DeadlinePassed) => {
            return Err(DomainError::PreconditionFailed(
                "voting deadline has passed".to_string(),
            ));
        }
        Err(VoteValidationError::RoundNotVoting) => {
            return Err(DomainError::InvalidState {
                status: round.status,
            });
        }
        Err(other) => return Err(other.into()),
    }

    VoteRepository::new(pool)
        .replace_for_voter(round_id, req.voter_id, &batch)
        .await?;

    Ok(())
}
