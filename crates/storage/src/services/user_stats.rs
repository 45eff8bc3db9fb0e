use catalog::GenreLookup;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Submission, Vote, VoteKind};
use crate::repository::round::RoundRepository;
use crate::repository::submission::SubmissionRepository;
use crate::repository::user_statistic::UserStatisticRepository;
use crate::repository::vote::VoteRepository;
use crate::services::RevealWarning;
use crate::services::scoring::{self, RoundResult};

/// Affinity maps keep only this many genre tags.
pub const GENRE_AFFINITY_CAP: usize = 50;

/// Everything one revealed round contributes to one participant's statistics
/// row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatDelta {
    pub user_id: Uuid,
    pub placement: i64,
    pub won: bool,
    pub total_points: i64,
    pub votes_cast: i64,
    pub upvotes_cast: i64,
    pub downvotes_cast: i64,
}

/// Fold one revealed round into every participant's statistics row, season
/// scope then all-time scope. Genre lookups are best-effort: failures become
/// warnings and the rest of the update proceeds.
pub async fn apply_round_result(
    pool: &PgPool,
    lookup: &dyn GenreLookup,
    league_id: Uuid,
    season_id: Option<Uuid>,
    result: &RoundResult,
    submissions: &[Submission],
    votes: &[Vote],
) -> Result<Vec<RevealWarning>> {
    let repo = UserStatisticRepository::new(pool);
    let mut warnings = Vec::new();

    let cast = votes_cast_by_user(votes);
    let deltas: Vec<UserStatDelta> = scoring::per_user_deltas(result)
        .into_iter()
        .map(|d| {
            let (total, up, down) = cast.get(&d.user_id).copied().unwrap_or_default();
            UserStatDelta {
                user_id: d.user_id,
                placement: d.placement,
                won: d.won,
                total_points: d.total_points,
                votes_cast: total,
                upvotes_cast: up,
                downvotes_cast: down,
            }
        })
        .collect();

    if let Some(season_id) = season_id {
        for delta in &deltas {
            repo.apply_delta(league_id, Some(season_id), delta).await?;
        }
    }
    for delta in &deltas {
        repo.apply_delta(league_id, None, delta).await?;
    }

    for delta in &deltas {
        let tags = lookup_genres_for_user(lookup, submissions, delta.user_id, &mut warnings).await;
        if tags.is_empty() {
            continue;
        }

        if let Some(season_id) = season_id {
            repo.merge_genre_affinity(league_id, Some(season_id), delta.user_id, &tags)
                .await?;
        }
        repo.merge_genre_affinity(league_id, None, delta.user_id, &tags)
            .await?;
    }

    Ok(warnings)
}

async fn lookup_genres_for_user(
    lookup: &dyn GenreLookup,
    submissions: &[Submission],
    user_id: Uuid,
    warnings: &mut Vec<RevealWarning>,
) -> Vec<String> {
    let mut tags = Vec::new();
    for submission in submissions.iter().filter(|s| s.user_id == user_id) {
        let Some(track_id) = submission.provider_track_id.as_deref() else {
            continue;
        };
        match lookup.genre_tags(track_id).await {
            Ok(found) => tags.extend(found),
            Err(e) => {
                tracing::warn!(
                    submission_id = %submission.submission_id,
                    error = %e,
                    "genre lookup failed, skipping"
                );
                warnings.push(RevealWarning::new(
                    "genre_lookup",
                    format!("submission {}: {e}", submission.submission_id),
                ));
            }
        }
    }
    tags
}

/// Merge observed tags into an affinity map, then keep only the
/// `GENRE_AFFINITY_CAP` highest counts. Ties at the cutoff break by tag name
/// so the survivor set is deterministic.
pub fn merge_affinity(affinity: &mut HashMap<String, i64>, tags: &[String]) {
    for tag in tags {
        *affinity.entry(tag.clone()).or_insert(0) += 1;
    }

    if affinity.len() > GENRE_AFFINITY_CAP {
        let mut ordered: Vec<(String, i64)> = affinity.drain().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ordered.truncate(GENRE_AFFINITY_CAP);
        affinity.extend(ordered);
    }
}

/// Count the votes each user cast in a round: (total, upvotes, downvotes).
pub fn votes_cast_by_user(votes: &[Vote]) -> HashMap<Uuid, (i64, i64, i64)> {
    let mut cast: HashMap<Uuid, (i64, i64, i64)> = HashMap::new();
    for vote in votes {
        let counts = cast.entry(vote.voter_id).or_default();
        counts.0 += 1;
        match vote.kind {
            VoteKind::Upvote => counts.1 += 1,
            VoteKind::Downvote => counts.2 += 1,
        }
    }
    cast
}

/// Derived on read, never stored: scan the user's submission history in
/// chronological round order and find the longest run of consecutive wins.
pub async fn win_streak(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
    user_id: Uuid,
) -> Result<i64> {
    let rounds = RoundRepository::new(pool)
        .list_scored(league_id, season_id)
        .await?;
    let round_ids: Vec<Uuid> = rounds.iter().map(|r| r.round_id).collect();

    let submission_repo = SubmissionRepository::new(pool);
    let vote_repo = VoteRepository::new(pool);

    // One query decides which rounds the user entered; only those are
    // replayed in full.
    let entered: HashSet<Uuid> = submission_repo
        .list_by_user(&round_ids, user_id)
        .await?
        .into_iter()
        .map(|s| s.round_id)
        .collect();

    let mut wins = Vec::new();
    for round in &rounds {
        if !entered.contains(&round.round_id) {
            continue;
        }
        let submissions = submission_repo.list_by_round(round.round_id).await?;
        let votes = vote_repo.list_by_round(round.round_id).await?;
        let result = scoring::score_round(round.round_id, &submissions, &votes);
        wins.push(result.winner_user_id == Some(user_id));
    }

    Ok(longest_win_streak(&wins))
}

/// Longest run of consecutive `true` entries.
pub fn longest_win_streak(wins: &[bool]) -> i64 {
    let mut best = 0i64;
    let mut current = 0i64;
    for &won in wins {
        if won {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_requires_consecutive_wins() {
        // Placements [1, 3, 1]: two wins, never back to back.
        assert_eq!(longest_win_streak(&[true, false, true]), 1);
    }

    #[test]
    fn test_streak_counts_longest_run() {
        assert_eq!(longest_win_streak(&[false, true, true, true, false, true]), 3);
        assert_eq!(longest_win_streak(&[]), 0);
        assert_eq!(longest_win_streak(&[false, false]), 0);
    }

    #[test]
    fn test_votes_cast_counts_by_kind() {
        let votes = vec![
            Vote {
                round_id: Uuid::from_u128(1),
                voter_id: Uuid::from_u128(10),
                submission_id: Uuid::from_u128(2),
                points: 3,
                kind: VoteKind::Upvote,
            },
            Vote {
                round_id: Uuid::from_u128(1),
                voter_id: Uuid::from_u128(10),
                submission_id: Uuid::from_u128(3),
                points: -1,
                kind: VoteKind::Downvote,
            },
            Vote {
                round_id: Uuid::from_u128(1),
                voter_id: Uuid::from_u128(20),
                submission_id: Uuid::from_u128(2),
                points: 2,
                kind: VoteKind::Upvote,
            },
        ];

        let cast = votes_cast_by_user(&votes);
        assert_eq!(cast[&Uuid::from_u128(10)], (2, 1, 1));
        assert_eq!(cast[&Uuid::from_u128(20)], (1, 1, 0));
    }

    #[test]
    fn test_merge_affinity_accumulates_counts() {
        let mut affinity = HashMap::new();
        merge_affinity(&mut affinity, &["techno".into(), "house".into()]);
        merge_affinity(&mut affinity, &["techno".into()]);

        assert_eq!(affinity["techno"], 2);
        assert_eq!(affinity["house"], 1);
    }

    #[test]
    fn test_affinity_from_earlier_rounds_survives_later_merges() {
        // Counts written by one round's reveal must still be present after
        // another round's reveal merges a disjoint tag set into the same map.
        let mut affinity = HashMap::new();
        merge_affinity(&mut affinity, &["techno".into(), "techno".into()]);
        merge_affinity(&mut affinity, &["ambient".into()]);

        assert_eq!(affinity["techno"], 2);
        assert_eq!(affinity["ambient"], 1);
        assert_eq!(affinity.len(), 2);
    }

    #[test]
    fn test_merge_affinity_caps_at_top_fifty() {
        let mut affinity: HashMap<String, i64> =
            (0..GENRE_AFFINITY_CAP).map(|i| (format!("tag-{i:02}"), 5)).collect();

        // A newcomer with count 1 must not displace any of the 5s.
        merge_affinity(&mut affinity, &["newcomer".into()]);
        assert_eq!(affinity.len(), GENRE_AFFINITY_CAP);
        assert!(!affinity.contains_key("newcomer"));

        // But a tag observed often enough earns its slot.
        let heavy = vec!["heavy".to_string(); 10];
        merge_affinity(&mut affinity, &heavy);
        assert_eq!(affinity.len(), GENRE_AFFINITY_CAP);
        assert_eq!(affinity["heavy"], 10);
    }
}
