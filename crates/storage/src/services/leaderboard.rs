use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, Result};
use crate::models::{LeaderboardTotals, Round};
use crate::repository::leaderboard::LeaderboardRepository;
use crate::repository::round::RoundRepository;
use crate::repository::submission::SubmissionRepository;
use crate::repository::vote::VoteRepository;
use crate::services::scoring::{self, RoundResult, UserRoundDelta};

/// Outcome of a full rebuild, for callers and logs.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct RebuildSummary {
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub rounds_replayed: usize,
    pub entries_written: usize,
}

/// Incremental mode: fold one revealed round into the season-scoped entries,
/// then the all-time entries. Each upsert is a single add-delta statement.
pub async fn apply_round_result(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
    result: &RoundResult,
) -> Result<()> {
    let repo = LeaderboardRepository::new(pool);
    let deltas = scoring::per_user_deltas(result);

    if let Some(season_id) = season_id {
        for delta in &deltas {
            repo.apply_delta(league_id, Some(season_id), delta).await?;
        }
    }
    for delta in &deltas {
        repo.apply_delta(league_id, None, delta).await?;
    }

    Ok(())
}

/// Full rebuild: recompute the scope's entries from scratch by replaying the
/// scoring engine over the given rounds, then swap the entry set in one
/// transaction. Replaying the same round set twice yields identical rows,
/// which is what makes this the repair path for drifted aggregates.
pub async fn rebuild(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
    round_ids: Option<Vec<Uuid>>,
) -> DomainResult<RebuildSummary> {
    let round_repo = RoundRepository::new(pool);

    let rounds: Vec<Round> = match round_ids {
        Some(ids) => {
            let mut rounds = Vec::with_capacity(ids.len());
            for id in ids {
                let round = round_repo.find_by_id(id).await?;
                if round.league_id != league_id {
                    return Err(DomainError::Storage(crate::error::StorageError::NotFound));
                }
                if !round.status.is_scored() {
                    return Err(DomainError::PreconditionFailed(format!(
                        "round {} has not been revealed",
                        round.round_id
                    )));
                }
                rounds.push(round);
            }
            rounds
        }
        None => round_repo.list_scored(league_id, season_id).await?,
    };

    let submission_repo = SubmissionRepository::new(pool);
    let vote_repo = VoteRepository::new(pool);

    let mut totals: BTreeMap<Uuid, LeaderboardTotals> = BTreeMap::new();
    for round in &rounds {
        let submissions = submission_repo.list_by_round(round.round_id).await?;
        let votes = vote_repo.list_by_round(round.round_id).await?;
        let result = scoring::score_round(round.round_id, &submissions, &votes);
        accumulate(&mut totals, &scoring::per_user_deltas(&result));
    }

    let entries: Vec<(Uuid, LeaderboardTotals)> = totals.into_iter().collect();
    LeaderboardRepository::new(pool)
        .replace_scope(league_id, season_id, &entries)
        .await?;

    Ok(RebuildSummary {
        league_id,
        season_id,
        rounds_replayed: rounds.len(),
        entries_written: entries.len(),
    })
}

/// Fold per-user round deltas into running totals. The map is keyed by user
/// id, so iteration order (and therefore the rebuilt entry set) is
/// deterministic.
pub fn accumulate(totals: &mut BTreeMap<Uuid, LeaderboardTotals>, deltas: &[UserRoundDelta]) {
    for delta in deltas {
        let entry = totals.entry(delta.user_id).or_default();
        entry.total_points += delta.total_points;
        entry.upvotes += delta.upvotes;
        entry.downvotes += delta.downvotes;
        entry.wins += i64::from(delta.won);
        entry.rounds_played += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(user: u128, points: i64, won: bool) -> UserRoundDelta {
        UserRoundDelta {
            user_id: Uuid::from_u128(user),
            total_points: points,
            upvotes: points.max(0),
            downvotes: 0,
            placement: if won { 1 } else { 2 },
            won,
        }
    }

    #[test]
    fn test_accumulate_sums_across_rounds() {
        let mut totals = BTreeMap::new();
        accumulate(&mut totals, &[delta(1, 5, true), delta(2, 3, false)]);
        accumulate(&mut totals, &[delta(1, 2, false), delta(2, 7, true)]);

        let one = totals[&Uuid::from_u128(1)];
        assert_eq!(one.total_points, 7);
        assert_eq!(one.wins, 1);
        assert_eq!(one.rounds_played, 2);

        let two = totals[&Uuid::from_u128(2)];
        assert_eq!(two.total_points, 10);
        assert_eq!(two.wins, 1);
    }

    #[test]
    fn test_replay_is_deterministic() {
        // The same round set replayed twice produces identical totals in
        // identical order.
        let rounds = vec![
            vec![delta(7, 4, true), delta(3, 2, false)],
            vec![delta(3, 9, true), delta(7, 1, false)],
        ];

        let build = || {
            let mut totals = BTreeMap::new();
            for deltas in &rounds {
                accumulate(&mut totals, deltas);
            }
            totals.into_iter().collect::<Vec<_>>()
        };

        assert_eq!(build(), build());
    }
}
