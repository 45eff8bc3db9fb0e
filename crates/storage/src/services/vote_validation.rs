use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::VoteValidationError;
use crate::models::{RoundStatus, VoteKind, VotingConfig, VotingRules};

/// One proposed vote, before persistence.
#[derive(Debug, Clone)]
pub struct VoteInput {
    pub submission_id: Uuid,
    pub points: i32,
    pub kind: VoteKind,
}

/// Validate a user's full vote batch for a round against the effective
/// voting configuration. Rules are checked in a fixed order so the caller
/// always sees the first violated rule.
pub fn validate_batch(
    batch: &[VoteInput],
    config: &VotingConfig,
    round_submissions: &HashSet<Uuid>,
    voter_submissions: &HashSet<Uuid>,
) -> Result<(), VoteValidationError> {
    // 1. Every vote must target a submission of this round.
    for vote in batch {
        if !round_submissions.contains(&vote.submission_id) {
            return Err(VoteValidationError::UnknownSubmission(vote.submission_id));
        }
    }

    // 2. Self-votes, unless the league allows them.
    if !config.allow_self_votes
        && batch
            .iter()
            .any(|v| voter_submissions.contains(&v.submission_id))
    {
        return Err(VoteValidationError::SelfVoteForbidden);
    }

    // 3. Count limits.
    let upvotes: Vec<&VoteInput> = batch.iter().filter(|v| v.kind == VoteKind::Upvote).collect();
    let downvotes: Vec<&VoteInput> = batch
        .iter()
        .filter(|v| v.kind == VoteKind::Downvote)
        .collect();

    if upvotes.len() > config.max_upvotes as usize {
        return Err(VoteValidationError::TooManyUpvotes {
            got: upvotes.len(),
            max: config.max_upvotes,
        });
    }
    if downvotes.len() > config.max_downvotes as usize {
        return Err(VoteValidationError::TooManyDownvotes {
            got: downvotes.len(),
            max: config.max_downvotes,
        });
    }
    if !downvotes.is_empty() && !config.downvotes_enabled {
        return Err(VoteValidationError::DownvotingDisabled);
    }

    // 4. Style-specific point values.
    match &config.rules {
        VotingRules::SinglePick => {
            if upvotes.len() > 1 {
                return Err(VoteValidationError::TooManyUpvotes {
                    got: upvotes.len(),
                    max: 1,
                });
            }
            if let Some(pick) = upvotes.first()
                && pick.points != 1
            {
                return Err(VoteValidationError::InvalidPointValue(pick.points));
            }
        }
        VotingRules::Rank {
            upvote_points,
            downvote_points,
        } => {
            check_rank_sequence(&upvotes, upvote_points, "upvote")?;
            check_rank_sequence(&downvotes, downvote_points, "downvote")?;
        }
        VotingRules::Points {
            upvote_points,
            downvote_points,
        } => {
            check_point_membership(&upvotes, upvote_points)?;
            check_point_membership(&downvotes, downvote_points)?;
        }
    }

    Ok(())
}

/// A round accepts votes only while in `voting` and before its deadline.
pub fn check_round_open(
    status: RoundStatus,
    voting_ends_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), VoteValidationError> {
    if status != RoundStatus::Voting {
        return Err(VoteValidationError::RoundNotVoting);
    }
    if let Some(deadline) = voting_ends_at
        && now > deadline
    {
        return Err(VoteValidationError::DeadlinePassed);
    }
    Ok(())
}

/// With N votes cast, the multiset of values used must be exactly the first
/// N entries of the configured sequence; which submission got which value is
/// free.
fn check_rank_sequence(
    votes: &[&VoteInput],
    configured: &[i32],
    kind: &'static str,
) -> Result<(), VoteValidationError> {
    if votes.is_empty() {
        return Ok(());
    }
    if votes.len() > configured.len() {
        return Err(VoteValidationError::PointSequenceMismatch { kind });
    }

    let mut used: Vec<i32> = votes.iter().map(|v| v.points).collect();
    let mut expected: Vec<i32> = configured[..votes.len()].to_vec();
    used.sort_unstable();
    expected.sort_unstable();

    if used != expected {
        return Err(VoteValidationError::PointSequenceMismatch { kind });
    }
    Ok(())
}

fn check_point_membership(
    votes: &[&VoteInput],
    configured: &[i32],
) -> Result<(), VoteValidationError> {
    for vote in votes {
        if !configured.contains(&vote.points) {
            return Err(VoteValidationError::InvalidPointValue(vote.points));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sub(id: u128) -> Uuid {
        Uuid::from_u128(id)
    }

    fn up(id: u128, points: i32) -> VoteInput {
        VoteInput {
            submission_id: sub(id),
            points,
            kind: VoteKind::Upvote,
        }
    }

    fn down(id: u128, points: i32) -> VoteInput {
        VoteInput {
            submission_id: sub(id),
            points,
            kind: VoteKind::Downvote,
        }
    }

    fn round_subs(ids: &[u128]) -> HashSet<Uuid> {
        ids.iter().map(|&id| sub(id)).collect()
    }

    fn points_config() -> VotingConfig {
        VotingConfig {
            max_upvotes: 3,
            max_downvotes: 1,
            downvotes_enabled: true,
            allow_self_votes: false,
            rules: VotingRules::Points {
                upvote_points: vec![1, 2, 3],
                downvote_points: vec![-1],
            },
        }
    }

    fn rank_config() -> VotingConfig {
        VotingConfig {
            max_upvotes: 3,
            max_downvotes: 2,
            downvotes_enabled: true,
            allow_self_votes: false,
            rules: VotingRules::Rank {
                upvote_points: vec![3, 2, 1],
                downvote_points: vec![-2, -1],
            },
        }
    }

    fn single_pick_config() -> VotingConfig {
        VotingConfig {
            max_upvotes: 1,
            max_downvotes: 0,
            downvotes_enabled: false,
            allow_self_votes: false,
            rules: VotingRules::SinglePick,
        }
    }

    #[test]
    fn test_unknown_submission_rejected_first() {
        let err = validate_batch(
            &[up(9, 1)],
            &points_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::UnknownSubmission(sub(9)));
    }

    #[test]
    fn test_self_vote_forbidden_by_default() {
        let err = validate_batch(
            &[up(1, 1)],
            &points_config(),
            &round_subs(&[1, 2]),
            &round_subs(&[1]),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::SelfVoteForbidden);
    }

    #[test]
    fn test_self_vote_allowed_when_configured() {
        let mut config = points_config();
        config.allow_self_votes = true;
        validate_batch(&[up(1, 1)], &config, &round_subs(&[1, 2]), &round_subs(&[1])).unwrap();
    }

    #[test]
    fn test_too_many_upvotes() {
        let batch = vec![up(1, 1), up(2, 1), up(3, 1), up(4, 1)];
        let err = validate_batch(
            &batch,
            &points_config(),
            &round_subs(&[1, 2, 3, 4]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::TooManyUpvotes { got: 4, max: 3 });
    }

    #[test]
    fn test_downvoting_disabled() {
        let mut config = points_config();
        config.downvotes_enabled = false;
        let err = validate_batch(
            &[down(1, -1)],
            &config,
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::DownvotingDisabled);
    }

    #[test]
    fn test_downvote_count_checked_before_disabled_flag() {
        // A batch that both exceeds the limit and hits a disabled league
        // reports the count violation.
        let mut config = points_config();
        config.downvotes_enabled = false;
        let err = validate_batch(
            &[down(1, -1), down(2, -1)],
            &config,
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::TooManyDownvotes { got: 2, max: 1 });
    }

    #[test]
    fn test_too_many_downvotes() {
        let err = validate_batch(
            &[down(1, -1), down(2, -1)],
            &points_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::TooManyDownvotes { got: 2, max: 1 });
    }

    #[test]
    fn test_points_style_accepts_configured_values() {
        let batch = vec![up(1, 3), up(2, 3), down(3, -1)];
        validate_batch(
            &batch,
            &points_config(),
            &round_subs(&[1, 2, 3]),
            &HashSet::new(),
        )
        .unwrap();
    }

    #[test]
    fn test_points_style_rejects_values_outside_the_set() {
        let err = validate_batch(
            &[up(1, 5)],
            &points_config(),
            &round_subs(&[1]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::InvalidPointValue(5));
    }

    #[test]
    fn test_rank_prefix_of_sequence_accepted() {
        // Two upvotes against [3, 2, 1]: values {3, 2} in either assignment.
        let batch = vec![up(2, 2), up(1, 3)];
        validate_batch(
            &batch,
            &rank_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap();
    }

    #[test]
    fn test_rank_duplicate_values_rejected() {
        let batch = vec![up(1, 3), up(2, 3)];
        let err = validate_batch(
            &batch,
            &rank_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            VoteValidationError::PointSequenceMismatch { kind: "upvote" }
        );
    }

    #[test]
    fn test_rank_skipping_a_weight_rejected() {
        // {3, 1} is not the two-entry prefix of [3, 2, 1].
        let batch = vec![up(1, 3), up(2, 1)];
        let err = validate_batch(
            &batch,
            &rank_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            VoteValidationError::PointSequenceMismatch { kind: "upvote" }
        );
    }

    #[test]
    fn test_rank_checks_downvote_sequence_separately() {
        let batch = vec![up(1, 3), down(2, -1)];
        let err = validate_batch(
            &batch,
            &rank_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            VoteValidationError::PointSequenceMismatch { kind: "downvote" }
        );

        let batch = vec![up(1, 3), down(2, -2)];
        validate_batch(
            &batch,
            &rank_config(),
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap();
    }

    #[test]
    fn test_single_pick_requires_exactly_one_point() {
        let err = validate_batch(
            &[up(1, 2)],
            &single_pick_config(),
            &round_subs(&[1]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::InvalidPointValue(2));

        validate_batch(
            &[up(1, 1)],
            &single_pick_config(),
            &round_subs(&[1]),
            &HashSet::new(),
        )
        .unwrap();
    }

    #[test]
    fn test_single_pick_rejects_two_picks() {
        let mut config = single_pick_config();
        config.max_upvotes = 3;
        let err = validate_batch(
            &[up(1, 1), up(2, 1)],
            &config,
            &round_subs(&[1, 2]),
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, VoteValidationError::TooManyUpvotes { got: 2, max: 1 });
    }

    #[test]
    fn test_empty_batch_is_valid() {
        validate_batch(&[], &rank_config(), &round_subs(&[1]), &HashSet::new()).unwrap();
    }

    #[test]
    fn test_round_must_be_voting() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            check_round_open(RoundStatus::Submitting, None, now).unwrap_err(),
            VoteValidationError::RoundNotVoting
        );
        check_round_open(RoundStatus::Voting, None, now).unwrap();
    }

    #[test]
    fn test_deadline_gate() {
        let deadline = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let late = deadline + chrono::Duration::seconds(1);
        assert_eq!(
            check_round_open(RoundStatus::Voting, Some(deadline), late).unwrap_err(),
            VoteValidationError::DeadlinePassed
        );
        check_round_open(RoundStatus::Voting, Some(deadline), deadline).unwrap();
    }
}
