use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Submission, Vote, VoteKind};

/// One submission's tallied result within a round.
#[derive(Debug, Clone)]
pub struct SubmissionScore {
    pub submission_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub artist: String,
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    /// Strict 1-based rank. Ties are resolved by the ordering keys, so no
    /// two submissions ever share a placement. Wins and placement statistics
    /// use this number.
    pub placement: i64,
    /// Presentation rank: submissions equal on (points, upvotes) share a
    /// position and the next distinct score skips ahead (1, 1, 3).
    pub display_position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RoundResult {
    pub round_id: Uuid,
    pub ranked: Vec<SubmissionScore>,
    pub winner_user_id: Option<Uuid>,
}

/// Per-user aggregated deltas of one round, consumed by the leaderboard and
/// statistics aggregators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoundDelta {
    pub user_id: Uuid,
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub placement: i64,
    pub won: bool,
}

/// Tally votes and produce the round's total ordering.
///
/// Ordering keys, applied everywhere a ranking is produced: total points
/// descending, upvote count descending, submission creation time ascending.
/// The submission id is the final disambiguator so the result is
/// deterministic even for identical timestamps.
pub fn score_round(round_id: Uuid, submissions: &[Submission], votes: &[Vote]) -> RoundResult {
    let mut tallies: HashMap<Uuid, (i64, i64, i64)> = HashMap::new();

    for vote in votes {
        let tally = tallies.entry(vote.submission_id).or_default();
        tally.0 += i64::from(vote.points);
        match vote.kind {
            VoteKind::Upvote => tally.1 += 1,
            VoteKind::Downvote => tally.2 += 1,
        }
    }

    let mut ranked: Vec<SubmissionScore> = submissions
        .iter()
        .map(|submission| {
            let (total_points, upvotes, downvotes) = tallies
                .get(&submission.submission_id)
                .copied()
                .unwrap_or_default();

            SubmissionScore {
                submission_id: submission.submission_id,
                user_id: submission.user_id,
                title: submission.title.clone(),
                artist: submission.artist.clone(),
                total_points,
                upvotes,
                downvotes,
                placement: 0,
                display_position: 0,
                created_at: submission.created_at,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.upvotes.cmp(&a.upvotes))
            .then(a.created_at.cmp(&b.created_at))
            .then(a.submission_id.cmp(&b.submission_id))
    });

    for i in 0..ranked.len() {
        ranked[i].placement = (i + 1) as i64;
        let tied_with_previous = i > 0
            && ranked[i].total_points == ranked[i - 1].total_points
            && ranked[i].upvotes == ranked[i - 1].upvotes;
        ranked[i].display_position = if tied_with_previous {
            ranked[i - 1].display_position
        } else {
            (i + 1) as i64
        };
    }

    let winner_user_id = ranked.first().map(|top| top.user_id);

    RoundResult {
        round_id,
        ranked,
        winner_user_id,
    }
}

/// Collapse a round result into per-user deltas, sorted by user id so every
/// consumer walks them in the same order. One submission per (round, user)
/// means each user appears at most once.
pub fn per_user_deltas(result: &RoundResult) -> Vec<UserRoundDelta> {
    let mut deltas: Vec<UserRoundDelta> = result
        .ranked
        .iter()
        .map(|score| UserRoundDelta {
            user_id: score.user_id,
            total_points: score.total_points,
            upvotes: score.upvotes,
            downvotes: score.downvotes,
            placement: score.placement,
            won: result.winner_user_id == Some(score.user_id) && score.placement == 1,
        })
        .collect();

    deltas.sort_by_key(|d| d.user_id);
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(offset: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap()
    }

    fn submission(id: u128, user: u128, created: i64) -> Submission {
        Submission {
            submission_id: Uuid::from_u128(id),
            round_id: Uuid::from_u128(99),
            user_id: Uuid::from_u128(user),
            title: format!("track-{id}"),
            artist: "artist".to_string(),
            provider_track_id: None,
            created_at: ts(created),
        }
    }

    fn vote(submission: u128, voter: u128, points: i32, kind: VoteKind) -> Vote {
        Vote {
            round_id: Uuid::from_u128(99),
            voter_id: Uuid::from_u128(voter),
            submission_id: Uuid::from_u128(submission),
            points,
            kind,
        }
    }

    #[test]
    fn test_more_upvotes_breaks_point_tie() {
        // A: 5 points from 2 upvotes. B: 5 points from 1 upvote (and two
        // noise downvotes worth 0 total effect). A ranks first.
        let subs = vec![submission(1, 10, 0), submission(2, 20, 1)];
        let votes = vec![
            vote(1, 30, 3, VoteKind::Upvote),
            vote(1, 40, 2, VoteKind::Upvote),
            vote(2, 30, 5, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        assert_eq!(result.ranked[0].submission_id, Uuid::from_u128(1));
        assert_eq!(result.winner_user_id, Some(Uuid::from_u128(10)));
    }

    #[test]
    fn test_earlier_submission_breaks_full_tie() {
        let subs = vec![submission(2, 20, 5), submission(1, 10, 0)];
        let votes = vec![
            vote(1, 30, 4, VoteKind::Upvote),
            vote(2, 40, 4, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        assert_eq!(result.ranked[0].submission_id, Uuid::from_u128(1));
        assert_eq!(result.ranked[0].placement, 1);
        assert_eq!(result.ranked[1].placement, 2);
    }

    #[test]
    fn test_earlier_created_wins_the_round_on_tie() {
        // S1 and S2 both at 4 points with equal upvote counts; S2 was
        // submitted earlier, so S2's author is the winner.
        let subs = vec![submission(1, 10, 10), submission(2, 20, 3)];
        let votes = vec![
            vote(1, 30, 4, VoteKind::Upvote),
            vote(2, 40, 4, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        assert_eq!(result.winner_user_id, Some(Uuid::from_u128(20)));
    }

    #[test]
    fn test_display_positions_group_ties_without_skipping_inside_group() {
        // Two tied leaders share display position 1, the next entry shows 3.
        let subs = vec![
            submission(1, 10, 0),
            submission(2, 20, 1),
            submission(3, 30, 2),
        ];
        let votes = vec![
            vote(1, 40, 4, VoteKind::Upvote),
            vote(2, 50, 4, VoteKind::Upvote),
            vote(3, 60, 1, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        let display: Vec<i64> = result.ranked.iter().map(|s| s.display_position).collect();
        let strict: Vec<i64> = result.ranked.iter().map(|s| s.placement).collect();
        assert_eq!(display, vec![1, 1, 3]);
        assert_eq!(strict, vec![1, 2, 3]);
    }

    #[test]
    fn test_downvotes_count_into_total() {
        let subs = vec![submission(1, 10, 0), submission(2, 20, 1)];
        let votes = vec![
            vote(1, 30, 3, VoteKind::Upvote),
            vote(1, 40, -2, VoteKind::Downvote),
            vote(2, 30, 2, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        assert_eq!(result.ranked[0].submission_id, Uuid::from_u128(2));
        assert_eq!(result.ranked[1].total_points, 1);
        assert_eq!(result.ranked[1].downvotes, 1);
    }

    #[test]
    fn test_unvoted_submissions_still_rank() {
        let subs = vec![submission(1, 10, 0)];
        let result = score_round(Uuid::from_u128(99), &subs, &[]);
        assert_eq!(result.ranked[0].total_points, 0);
        assert_eq!(result.ranked[0].placement, 1);
        assert_eq!(result.winner_user_id, Some(Uuid::from_u128(10)));
    }

    #[test]
    fn test_empty_round_has_no_winner() {
        let result = score_round(Uuid::from_u128(99), &[], &[]);
        assert!(result.ranked.is_empty());
        assert_eq!(result.winner_user_id, None);
    }

    #[test]
    fn test_per_user_deltas_mark_only_the_strict_winner() {
        let subs = vec![submission(1, 10, 0), submission(2, 20, 1)];
        let votes = vec![
            vote(1, 30, 4, VoteKind::Upvote),
            vote(2, 40, 4, VoteKind::Upvote),
        ];

        let result = score_round(Uuid::from_u128(99), &subs, &votes);
        let deltas = per_user_deltas(&result);

        assert_eq!(deltas.len(), 2);
        let winner = deltas.iter().find(|d| d.user_id == Uuid::from_u128(10)).unwrap();
        let runner_up = deltas.iter().find(|d| d.user_id == Uuid::from_u128(20)).unwrap();
        assert!(winner.won);
        assert!(!runner_up.won);
        assert_eq!(winner.placement, 1);
        assert_eq!(runner_up.placement, 2);
    }
}
