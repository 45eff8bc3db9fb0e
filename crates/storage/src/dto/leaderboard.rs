use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::LeaderboardEntry;

/// Query parameters for the leaderboard view. Pagination fields live
/// directly on the filter: query-string deserialization cannot see through
/// a flattened struct, so nesting them would reject every request that sets
/// them explicitly.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardFilter {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Omit for the all-time leaderboard.
    pub season_id: Option<Uuid>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl LeaderboardFilter {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > 100 {
            return Err("page_size must be between 1 and 100".to_string());
        }
        Ok(())
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntryResponse {
    pub rank: usize,
    pub user_id: Uuid,
    pub season_id: Option<Uuid>,
    pub total_points: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub wins: i64,
    pub rounds_played: i64,
    pub updated_at: DateTime<Utc>,
}

impl LeaderboardEntryResponse {
    pub fn from_entry(rank: usize, entry: LeaderboardEntry) -> Self {
        Self {
            rank,
            user_id: entry.user_id,
            season_id: entry.season_id,
            total_points: entry.total_points,
            upvotes: entry.upvotes,
            downvotes: entry.downvotes,
            wins: entry.wins,
            rounds_played: entry.rounds_played,
            updated_at: entry.updated_at,
        }
    }
}

/// Request payload for a full rebuild of one scope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RebuildRequest {
    /// Omit to rebuild the all-time scope.
    pub season_id: Option<Uuid>,
    /// Explicit revealed/archived rounds to replay; omit to replay every
    /// scored round of the scope.
    pub round_ids: Option<Vec<Uuid>>,
    /// Acting user; must be a league member.
    pub acting_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_from_query_string() {
        let filter: LeaderboardFilter =
            serde_urlencoded::from_str("page=2&page_size=10").unwrap();
        assert_eq!(filter.page, 2);
        assert_eq!(filter.page_size, 10);
        assert_eq!(filter.season_id, None);
        assert_eq!(filter.offset(), 10);
    }

    #[test]
    fn test_filter_defaults_when_params_omitted() {
        let filter: LeaderboardFilter = serde_urlencoded::from_str("").unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, 50);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_filter_parses_season_scope() {
        let id = Uuid::from_u128(42);
        let filter: LeaderboardFilter =
            serde_urlencoded::from_str(&format!("season_id={id}&page=3")).unwrap();
        assert_eq!(filter.season_id, Some(id));
        assert_eq!(filter.page, 3);
    }

    #[test]
    fn test_filter_bounds() {
        let filter: LeaderboardFilter = serde_urlencoded::from_str("page=0").unwrap();
        assert!(filter.validate().is_err());

        let filter: LeaderboardFilter = serde_urlencoded::from_str("page_size=101").unwrap();
        assert!(filter.validate().is_err());

        let filter: LeaderboardFilter = serde_urlencoded::from_str("page_size=100").unwrap();
        assert!(filter.validate().is_ok());
    }
}
