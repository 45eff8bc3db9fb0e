use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{LeaderboardEntry, LeaderboardTotals};
use crate::services::scoring::UserRoundDelta;

const ENTRY_COLUMNS: &str = "league_id, season_id, user_id, total_points, upvotes, downvotes, \
     wins, rounds_played, updated_at";

/// Repository for leaderboard entries. Incremental updates are expressed as
/// a single add-delta upsert so concurrent reveals of different rounds in
/// the same scope cannot lose updates.
pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn apply_delta(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
        delta: &UserRoundDelta,
    ) -> Result<()> {
        let wins = i64::from(delta.won);

        // The scope uniqueness lives in two partial indexes, so the conflict
        // target differs between season and all-time rows.
        let sql = match season_id {
            Some(_) => {
                "INSERT INTO leaderboard_entries
                     (league_id, season_id, user_id, total_points, upvotes, downvotes, wins, rounds_played)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
                 ON CONFLICT (league_id, season_id, user_id) WHERE season_id IS NOT NULL
                 DO UPDATE SET
                     total_points = leaderboard_entries.total_points + EXCLUDED.total_points,
                     upvotes = leaderboard_entries.upvotes + EXCLUDED.upvotes,
                     downvotes = leaderboard_entries.downvotes + EXCLUDED.downvotes,
                     wins = leaderboard_entries.wins + EXCLUDED.wins,
                     rounds_played = leaderboard_entries.rounds_played + 1,
                     updated_at = now()"
            }
            None => {
                "INSERT INTO leaderboard_entries
                     (league_id, season_id, user_id, total_points, upvotes, downvotes, wins, rounds_played)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
                 ON CONFLICT (league_id, user_id) WHERE season_id IS NULL
                 DO UPDATE SET
                     total_points = leaderboard_entries.total_points + EXCLUDED.total_points,
                     upvotes = leaderboard_entries.upvotes + EXCLUDED.upvotes,
                     downvotes = leaderboard_entries.downvotes + EXCLUDED.downvotes,
                     wins = leaderboard_entries.wins + EXCLUDED.wins,
                     rounds_played = leaderboard_entries.rounds_played + 1,
                     updated_at = now()"
            }
        };

        sqlx::query(sql)
            .bind(league_id)
            .bind(season_id)
            .bind(delta.user_id)
            .bind(delta.total_points)
            .bind(delta.upvotes)
            .bind(delta.downvotes)
            .bind(wins)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_scope(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let entries = match season_id {
            Some(season_id) => {
                sqlx::query_as::<_, LeaderboardEntry>(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM leaderboard_entries
                     WHERE league_id = $1 AND season_id = $2
                     ORDER BY total_points DESC, wins DESC, user_id"
                ))
                .bind(league_id)
                .bind(season_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LeaderboardEntry>(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM leaderboard_entries
                     WHERE league_id = $1 AND season_id IS NULL
                     ORDER BY total_points DESC, wins DESC, user_id"
                ))
                .bind(league_id)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(entries)
    }

    /// Replace every entry of the scope with freshly computed totals, as one
    /// transaction. Readers see the old set or the new set, never a
    /// partially deleted one.
    pub async fn replace_scope(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
        totals: &[(Uuid, LeaderboardTotals)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        match season_id {
            Some(season_id) => {
                sqlx::query(
                    "DELETE FROM leaderboard_entries WHERE league_id = $1 AND season_id = $2",
                )
                .bind(league_id)
                .bind(season_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "DELETE FROM leaderboard_entries WHERE league_id = $1 AND season_id IS NULL",
                )
                .bind(league_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        for (user_id, t) in totals {
            sqlx::query(
                "INSERT INTO leaderboard_entries
                     (league_id, season_id, user_id, total_points, upvotes, downvotes, wins, rounds_played)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(league_id)
            .bind(season_id)
            .bind(user_id)
            .bind(t.total_points)
            .bind(t.upvotes)
            .bind(t.downvotes)
            .bind(t.wins)
            .bind(t.rounds_played)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
