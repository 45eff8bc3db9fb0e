use std::time::Duration;

use catalog::GenreLookup;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{Round, RoundStatus};
use crate::repository::round::RoundRepository;
use crate::repository::submission::SubmissionRepository;
use crate::repository::vote::VoteRepository;
use crate::services::hooks::RevealHooks;
use crate::services::{RevealWarning, leaderboard, scoring, user_stats};

/// Upper bound on the fire-and-forget hook call. A slow notification target
/// must never stall a reveal.
const HOOK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct TransitionOutcome {
    pub round: Round,
    pub warnings: Vec<RevealWarning>,
}

#[derive(Debug, Default, serde::Serialize, utoipa::ToSchema)]
pub struct SweepSummary {
    pub voting_opened: usize,
    pub revealed: usize,
    pub warnings: Vec<RevealWarning>,
}

/// Move a round to `target`, which must be the single allowed successor of
/// its current status. Entering `revealed` runs the scoring and aggregation
/// pipeline on this call stack; pipeline failures are returned as warnings
/// and never roll the status back.
pub async fn transition(
    pool: &PgPool,
    hooks: &dyn RevealHooks,
    lookup: &dyn GenreLookup,
    round_id: Uuid,
    target: RoundStatus,
) -> DomainResult<TransitionOutcome> {
    let repo = RoundRepository::new(pool);
    let mut round = repo.find_by_id(round_id).await?;

    if round.status.next() != Some(target) {
        return Err(DomainError::InvalidTransition {
            from: round.status,
            to: target,
        });
    }

    let won = repo.update_status_cas(round_id, round.status, target).await?;
    if !won {
        return Err(DomainError::PreconditionFailed(
            "round status changed concurrently".to_string(),
        ));
    }
    round.status = target;

    let warnings = if target == RoundStatus::Revealed {
        run_reveal_pipeline(pool, hooks, lookup, &round).await
    } else {
        Vec::new()
    };

    Ok(TransitionOutcome { round, warnings })
}

/// Delete a round that never reached voting, together with its submissions.
pub async fn cancel(pool: &PgPool, round_id: Uuid) -> DomainResult<()> {
    let repo = RoundRepository::new(pool);
    let round = repo.find_by_id(round_id).await?;

    if !round.status.is_cancellable() {
        return Err(DomainError::InvalidState {
            status: round.status,
        });
    }

    repo.delete_with_submissions(round_id).await?;
    Ok(())
}

/// Time-driven forced transitions: close submission windows and reveal
/// rounds whose voting deadline passed. Safe to run repeatedly and
/// concurrently; the compare-and-set status update makes a round that
/// already moved on a no-op.
pub async fn sweep(
    pool: &PgPool,
    hooks: &dyn RevealHooks,
    lookup: &dyn GenreLookup,
    now: DateTime<Utc>,
) -> DomainResult<SweepSummary> {
    let repo = RoundRepository::new(pool);
    let mut summary = SweepSummary::default();

    for round in repo.list_due_submission_close(now).await? {
        if repo
            .update_status_cas(round.round_id, RoundStatus::Submitting, RoundStatus::Voting)
            .await?
        {
            tracing::info!(round_id = %round.round_id, "submission window closed, voting open");
            summary.voting_opened += 1;
        }
    }

    for mut round in repo.list_due_voting_close(now).await? {
        if repo
            .update_status_cas(round.round_id, RoundStatus::Voting, RoundStatus::Revealed)
            .await?
        {
            tracing::info!(round_id = %round.round_id, "voting deadline passed, revealing");
            round.status = RoundStatus::Revealed;
            summary.revealed += 1;
            summary
                .warnings
                .extend(run_reveal_pipeline(pool, hooks, lookup, &round).await);
        }
    }

    Ok(summary)
}

/// Scoring and aggregation for a round that just became `revealed`. Every
/// step is best-effort from the transition's point of view: failures are
/// logged, collected as warnings, and left for the rebuild path to repair.
async fn run_reveal_pipeline(
    pool: &PgPool,
    hooks: &dyn RevealHooks,
    lookup: &dyn GenreLookup,
    round: &Round,
) -> Vec<RevealWarning> {
    let mut warnings = Vec::new();

    let submissions = match SubmissionRepository::new(pool).list_by_round(round.round_id).await {
        Ok(submissions) => submissions,
        Err(e) => {
            tracing::error!(round_id = %round.round_id, error = %e, "reveal pipeline could not load submissions");
            warnings.push(RevealWarning::new("scoring", e.to_string()));
            return warnings;
        }
    };
    let votes = match VoteRepository::new(pool).list_by_round(round.round_id).await {
        Ok(votes) => votes,
        Err(e) => {
            tracing::error!(round_id = %round.round_id, error = %e, "reveal pipeline could not load votes");
            warnings.push(RevealWarning::new("scoring", e.to_string()));
            return warnings;
        }
    };

    let result = scoring::score_round(round.round_id, &submissions, &votes);

    if let Err(e) =
        leaderboard::apply_round_result(pool, round.league_id, round.season_id, &result).await
    {
        tracing::error!(round_id = %round.round_id, error = %e, "leaderboard aggregation failed");
        warnings.push(RevealWarning::new("leaderboard", e.to_string()));
    }

    match user_stats::apply_round_result(
        pool,
        lookup,
        round.league_id,
        round.season_id,
        &result,
        &submissions,
        &votes,
    )
    .await
    {
        Ok(stat_warnings) => warnings.extend(stat_warnings),
        Err(e) => {
            tracing::error!(round_id = %round.round_id, error = %e, "statistics aggregation failed");
            warnings.push(RevealWarning::new("user_statistics", e.to_string()));
        }
    }

    match tokio::time::timeout(HOOK_TIMEOUT, hooks.round_revealed(round, &result)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(round_id = %round.round_id, error = %e, "reveal hook failed");
            warnings.push(RevealWarning::new("hooks", e.to_string()));
        }
        Err(_) => {
            tracing::warn!(round_id = %round.round_id, "reveal hook timed out");
            warnings.push(RevealWarning::new("hooks", "hook timed out".to_string()));
        }
    }

    warnings
}
