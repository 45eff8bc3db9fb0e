use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Round, RoundStatus, Submission, VotingConfig};
use crate::services::RevealWarning;
use crate::services::round_lifecycle::TransitionOutcome;
use crate::services::scoring::RoundResult;

/// Request payload for creating a new round
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoundRequest {
    pub season_id: Option<Uuid>,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Theme must be between 1 and 500 characters"
    ))]
    pub theme: String,

    pub submission_starts_at: Option<DateTime<Utc>>,
    pub submission_ends_at: Option<DateTime<Utc>>,
    pub voting_ends_at: Option<DateTime<Utc>>,

    pub voting_override: Option<VotingConfig>,

    /// Acting user; must be a league member.
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub target: RoundStatus,
    /// Acting user; must be a league member.
    pub acting_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelRequest {
    pub acting_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 500))]
    pub title: String,

    #[validate(length(min = 1, max = 500))]
    pub artist: String,

    #[validate(length(max = 255))]
    pub provider_track_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoundResponse {
    pub round_id: Uuid,
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub theme: String,
    pub status: RoundStatus,
    pub submission_starts_at: Option<DateTime<Utc>>,
    pub submission_ends_at: Option<DateTime<Utc>>,
    pub voting_ends_at: Option<DateTime<Utc>>,
    pub voting_override: Option<VotingConfig>,
    pub created_at: DateTime<Utc>,
}

impl From<Round> for RoundResponse {
    fn from(round: Round) -> Self {
        Self {
            round_id: round.round_id,
            league_id: round.league_id,
            season_id: round.season_id,
            theme: round.theme,
            status: round.status,
            submission_starts_at: round.submission_starts_at,
            submission_ends_at: round.submission_ends_at,
            voting_ends_at: round.voting_ends_at,
            voting_override: round.voting_override.map(|json| json.0),
            created_at: round.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub round_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub artist: String,
    pub provider_track_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            submission_id: submission.submission_id,
            round_id: submission.round_id,
            user_id: submission.user_id,
            title: submission.title,
            artist: submission.artist,
            provider_track_id: submission.provider_track_id,
            created_at: submission.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub round: RoundResponse,
    pub warnings: Vec<RevealWarning>,
}

impl From<TransitionOutcome> for TransitionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            round: RoundResponse::from(outcome.round),
            warnings: outcome.warnings,
        }
    }
}

/// One position in the ranked results view.
#[derive(Debug, Serialize, ToSchema)]
pub struct RankedSubmissionResponse {
    /// Grouped presentation rank: full ties share a position (1, 1, 3).
    pub position: i64,
    /// Strict rank, as used for wins and placement statistics.
    pub placement: i64,
    pub submission_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub artist: String,
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoundResultsResponse {
    pub round_id: Uuid,
    pub winner_user_id: Option<Uuid>,
    pub positions: Vec<RankedSubmissionResponse>,
}

impl From<RoundResult> for RoundResultsResponse {
    fn from(result: RoundResult) -> Self {
        Self {
            round_id: result.round_id,
            winner_user_id: result.winner_user_id,
            positions: result
                .ranked
                .into_iter()
                .map(|score| RankedSubmissionResponse {
                    position: score.display_position,
                    placement: score.placement,
                    submission_id: score.submission_id,
                    user_id: score.user_id,
                    title: score.title,
                    artist: score.artist,
                    total_points: score.total_points,
                    upvotes: score.upvotes,
                    downvotes: score.downvotes,
                })
                .collect(),
        }
    }
}
