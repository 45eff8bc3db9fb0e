use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::UserStatistic;

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatisticsFilter {
    /// Omit for the all-time statistics row.
    pub season_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatisticsResponse {
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub user_id: Uuid,
    pub total_submissions: i64,
    pub votes_cast: i64,
    pub upvotes_cast: i64,
    pub downvotes_cast: i64,
    /// Running mean of strict placements, derived from stored totals.
    pub avg_placement: Option<f64>,
    pub best_placement: Option<i64>,
    pub worst_placement: Option<i64>,
    pub total_points: i64,
    pub total_wins: i64,
    /// Longest run of consecutive wins, derived on read.
    pub win_streak: i64,
    pub genre_affinity: HashMap<String, i64>,
    pub updated_at: DateTime<Utc>,
}

impl UserStatisticsResponse {
    pub fn from_statistic(stat: UserStatistic, win_streak: i64) -> Self {
        let avg_placement = stat.avg_placement();
        Self {
            league_id: stat.league_id,
            season_id: stat.season_id,
            user_id: stat.user_id,
            total_submissions: stat.total_submissions,
            votes_cast: stat.votes_cast,
            upvotes_cast: stat.upvotes_cast,
            downvotes_cast: stat.downvotes_cast,
            avg_placement,
            best_placement: stat.best_placement,
            worst_placement: stat.worst_placement,
            total_points: stat.total_points,
            total_wins: stat.total_wins,
            win_streak,
            genre_affinity: stat.genre_affinity.0,
            updated_at: stat.updated_at,
        }
    }
}
