use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregated standing for one user in one scope. `season_id = NULL` is the
/// all-time scope. Derived data: written only by the leaderboard aggregator,
/// repairable at any time via a full rebuild.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LeaderboardEntry {
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub user_id: Uuid,
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub wins: i64,
    pub rounds_played: i64,
    pub updated_at: DateTime<Utc>,
}

/// Plain accumulated totals for one user, produced by the rebuild replay
/// before they are written back as entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeaderboardTotals {
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub wins: i64,
    pub rounds_played: i64,
}
