use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-user aggregate, scoped like a leaderboard entry. The running mean is
/// never stored: `placement_sum / total_submissions` is always recomputable
/// from the row itself.
#[derive(Debug, Clone, FromRow)]
pub struct UserStatistic {
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub user_id: Uuid,
    pub total_submissions: i64,
    pub votes_cast: i64,
    pub upvotes_cast: i64,
    pub downvotes_cast: i64,
    pub placement_sum: i64,
    pub best_placement: Option<i64>,
    pub worst_placement: Option<i64>,
    pub total_points: i64,
    pub total_wins: i64,
    /// Genre tag -> observed count, capped to the top 50 by count.
    pub genre_affinity: Json<HashMap<String, i64>>,
    pub updated_at: DateTime<Utc>,
}

impl UserStatistic {
    pub fn avg_placement(&self) -> Option<f64> {
        if self.total_submissions == 0 {
            None
        } else {
            Some(self.placement_sum as f64 / self.total_submissions as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(placement_sum: i64, total_submissions: i64) -> UserStatistic {
        UserStatistic {
            league_id: Uuid::nil(),
            season_id: None,
            user_id: Uuid::nil(),
            total_submissions,
            votes_cast: 0,
            upvotes_cast: 0,
            downvotes_cast: 0,
            placement_sum,
            best_placement: None,
            worst_placement: None,
            total_points: 0,
            total_wins: 0,
            genre_affinity: Json(HashMap::new()),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_avg_placement_is_sum_over_count() {
        // Placements [1, 3, 1] -> 5/3.
        let s = stat(5, 3);
        assert!((s.avg_placement().unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_avg_placement_empty() {
        assert_eq!(stat(0, 0).avg_placement(), None);
    }
}
