use sqlx::PgPool;
use sqlx::types::Json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::UserStatistic;
use crate::services::user_stats::{UserStatDelta, merge_affinity};

const STAT_COLUMNS: &str = "league_id, season_id, user_id, total_submissions, votes_cast, \
     upvotes_cast, downvotes_cast, placement_sum, best_placement, worst_placement, \
     total_points, total_wins, genre_affinity, updated_at";

/// Repository for per-user statistics rows. Numeric fields are updated with
/// a single add-delta upsert; LEAST/GREATEST seed best/worst placement on
/// first observation because they ignore NULL.
pub struct UserStatisticRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStatisticRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn apply_delta(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
        delta: &UserStatDelta,
    ) -> Result<()> {
        let sql = match season_id {
            Some(_) => {
                "INSERT INTO user_statistics
                     (league_id, season_id, user_id, total_submissions, votes_cast, upvotes_cast,
                      downvotes_cast, placement_sum, best_placement, worst_placement,
                      total_points, total_wins)
                 VALUES ($1, $2, $3, 1, $4, $5, $6, $7, $7, $7, $8, $9)
                 ON CONFLICT (league_id, season_id, user_id) WHERE season_id IS NOT NULL
                 DO UPDATE SET
                     total_submissions = user_statistics.total_submissions + 1,
                     votes_cast = user_statistics.votes_cast + EXCLUDED.votes_cast,
                     upvotes_cast = user_statistics.upvotes_cast + EXCLUDED.upvotes_cast,
                     downvotes_cast = user_statistics.downvotes_cast + EXCLUDED.downvotes_cast,
                     placement_sum = user_statistics.placement_sum + EXCLUDED.placement_sum,
                     best_placement = LEAST(user_statistics.best_placement, EXCLUDED.best_placement),
                     worst_placement = GREATEST(user_statistics.worst_placement, EXCLUDED.worst_placement),
                     total_points = user_statistics.total_points + EXCLUDED.total_points,
                     total_wins = user_statistics.total_wins + EXCLUDED.total_wins,
                     updated_at = now()"
            }
            None => {
                "INSERT INTO user_statistics
                     (league_id, season_id, user_id, total_submissions, votes_cast, upvotes_cast,
                      downvotes_cast, placement_sum, best_placement, worst_placement,
                      total_points, total_wins)
                 VALUES ($1, $2, $3, 1, $4, $5, $6, $7, $7, $7, $8, $9)
                 ON CONFLICT (league_id, user_id) WHERE season_id IS NULL
                 DO UPDATE SET
                     total_submissions = user_statistics.total_submissions + 1,
                     votes_cast = user_statistics.votes_cast + EXCLUDED.votes_cast,
                     upvotes_cast = user_statistics.upvotes_cast + EXCLUDED.upvotes_cast,
                     downvotes_cast = user_statistics.downvotes_cast + EXCLUDED.downvotes_cast,
                     placement_sum = user_statistics.placement_sum + EXCLUDED.placement_sum,
                     best_placement = LEAST(user_statistics.best_placement, EXCLUDED.best_placement),
                     worst_placement = GREATEST(user_statistics.worst_placement, EXCLUDED.worst_placement),
                     total_points = user_statistics.total_points + EXCLUDED.total_points,
                     total_wins = user_statistics.total_wins + EXCLUDED.total_wins,
                     updated_at = now()"
            }
        };

        sqlx::query(sql)
            .bind(league_id)
            .bind(season_id)
            .bind(delta.user_id)
            .bind(delta.votes_cast)
            .bind(delta.upvotes_cast)
            .bind(delta.downvotes_cast)
            .bind(delta.placement)
            .bind(delta.total_points)
            .bind(i64::from(delta.won))
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn find(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
        user_id: Uuid,
    ) -> Result<UserStatistic> {
        let stat = match season_id {
            Some(season_id) => {
                sqlx::query_as::<_, UserStatistic>(&format!(
                    "SELECT {STAT_COLUMNS} FROM user_statistics
                     WHERE league_id = $1 AND season_id = $2 AND user_id = $3"
                ))
                .bind(league_id)
                .bind(season_id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserStatistic>(&format!(
                    "SELECT {STAT_COLUMNS} FROM user_statistics
                     WHERE league_id = $1 AND season_id IS NULL AND user_id = $2"
                ))
                .bind(league_id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?
            }
        };

        stat.ok_or(StorageError::NotFound)
    }

    /// Merge observed genre tags into the row's affinity map. The row is
    /// locked for the duration of the merge so concurrent reveals in the
    /// same scope serialize instead of overwriting each other's counts.
    pub async fn merge_genre_affinity(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
        user_id: Uuid,
        tags: &[String],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Json<HashMap<String, i64>>> = match season_id {
            Some(season_id) => {
                sqlx::query_scalar(
                    "SELECT genre_affinity FROM user_statistics
                     WHERE league_id = $1 AND season_id = $2 AND user_id = $3
                     FOR UPDATE",
                )
                .bind(league_id)
                .bind(season_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT genre_affinity FROM user_statistics
                     WHERE league_id = $1 AND season_id IS NULL AND user_id = $2
                     FOR UPDATE",
                )
                .bind(league_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(Json(mut affinity)) = current else {
            return Err(StorageError::NotFound);
        };
        merge_affinity(&mut affinity, tags);

        match season_id {
            Some(season_id) => {
                sqlx::query(
                    "UPDATE user_statistics SET genre_affinity = $4, updated_at = now()
                     WHERE league_id = $1 AND season_id = $2 AND user_id = $3",
                )
                .bind(league_id)
                .bind(season_id)
                .bind(user_id)
                .bind(Json(&affinity))
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "UPDATE user_statistics SET genre_affinity = $3, updated_at = now()
                     WHERE league_id = $1 AND season_id IS NULL AND user_id = $2",
                )
                .bind(league_id)
                .bind(user_id)
                .bind(Json(&affinity))
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
