use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::voting_config::VotingConfig;

/// Lifecycle state of a round. Strictly forward, `Archived` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "round_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Draft,
    Submitting,
    Voting,
    Revealed,
    Archived,
}

impl RoundStatus {
    /// The single allowed successor, or `None` from the terminal state.
    pub fn next(self) -> Option<RoundStatus> {
        match self {
            RoundStatus::Draft => Some(RoundStatus::Submitting),
            RoundStatus::Submitting => Some(RoundStatus::Voting),
            RoundStatus::Voting => Some(RoundStatus::Revealed),
            RoundStatus::Revealed => Some(RoundStatus::Archived),
            RoundStatus::Archived => None,
        }
    }

    /// Whether a round in this state may still be cancelled (deleted).
    pub fn is_cancellable(self) -> bool {
        matches!(self, RoundStatus::Draft | RoundStatus::Submitting)
    }

    /// Whether the round's results are final and may feed aggregation.
    pub fn is_scored(self) -> bool {
        matches!(self, RoundStatus::Revealed | RoundStatus::Archived)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundStatus::Draft => "draft",
            RoundStatus::Submitting => "submitting",
            RoundStatus::Voting => "voting",
            RoundStatus::Revealed => "revealed",
            RoundStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Round {
    pub round_id: Uuid,
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub theme: String,
    pub status: RoundStatus,
    pub submission_starts_at: Option<DateTime<Utc>>,
    pub submission_ends_at: Option<DateTime<Utc>>,
    pub voting_ends_at: Option<DateTime<Utc>>,
    /// Per-round override of the league voting configuration.
    pub voting_override: Option<Json<VotingConfig>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_is_strictly_forward() {
        assert_eq!(RoundStatus::Draft.next(), Some(RoundStatus::Submitting));
        assert_eq!(RoundStatus::Submitting.next(), Some(RoundStatus::Voting));
        assert_eq!(RoundStatus::Voting.next(), Some(RoundStatus::Revealed));
        assert_eq!(RoundStatus::Revealed.next(), Some(RoundStatus::Archived));
        assert_eq!(RoundStatus::Archived.next(), None);
    }

    #[test]
    fn test_no_state_is_its_own_successor() {
        for status in [
            RoundStatus::Draft,
            RoundStatus::Submitting,
            RoundStatus::Voting,
            RoundStatus::Revealed,
            RoundStatus::Archived,
        ] {
            assert_ne!(status.next(), Some(status));
        }
    }

    #[test]
    fn test_cancellable_only_before_voting() {
        assert!(RoundStatus::Draft.is_cancellable());
        assert!(RoundStatus::Submitting.is_cancellable());
        assert!(!RoundStatus::Voting.is_cancellable());
        assert!(!RoundStatus::Revealed.is_cancellable());
        assert!(!RoundStatus::Archived.is_cancellable());
    }
}
