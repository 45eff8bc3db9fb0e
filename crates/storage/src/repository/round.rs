use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::round::CreateRoundRequest;
use crate::error::{Result, StorageError};
use crate::models::{Round, RoundStatus};

const ROUND_COLUMNS: &str = "round_id, league_id, season_id, theme, status, \
     submission_starts_at, submission_ends_at, voting_ends_at, voting_override, created_at";

/// Repository for round rows. Status changes go through the compare-and-set
/// update so two sweeps or a sweep racing a manual transition can never
/// advance the same round twice.
pub struct RoundRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoundRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, league_id: Uuid, req: &CreateRoundRequest) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(&format!(
            "INSERT INTO rounds (league_id, season_id, theme, status, submission_starts_at,
                                 submission_ends_at, voting_ends_at, voting_override)
             VALUES ($1, $2, $3, 'draft', $4, $5, $6, $7)
             RETURNING {ROUND_COLUMNS}"
        ))
        .bind(league_id)
        .bind(req.season_id)
        .bind(&req.theme)
        .bind(req.submission_starts_at)
        .bind(req.submission_ends_at)
        .bind(req.voting_ends_at)
        .bind(req.voting_override.as_ref().map(Json))
        .fetch_one(self.pool)
        .await?;

        Ok(round)
    }

    pub async fn find_by_id(&self, round_id: Uuid) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(&format!(
            "SELECT {ROUND_COLUMNS} FROM rounds WHERE round_id = $1"
        ))
        .bind(round_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(round)
    }

    pub async fn list_by_league(&self, league_id: Uuid) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(&format!(
            "SELECT {ROUND_COLUMNS} FROM rounds WHERE league_id = $1 ORDER BY created_at"
        ))
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }

    /// Set the status only if the round is still in `from`. Returns whether
    /// the update won.
    pub async fn update_status_cas(
        &self,
        round_id: Uuid,
        from: RoundStatus,
        to: RoundStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE rounds SET status = $3 WHERE round_id = $1 AND status = $2")
            .bind(round_id)
            .bind(from)
            .bind(to)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Rounds still open for submissions whose submission window has closed.
    pub async fn list_due_submission_close(&self, now: DateTime<Utc>) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(&format!(
            "SELECT {ROUND_COLUMNS} FROM rounds
             WHERE status = 'submitting' AND submission_ends_at IS NOT NULL
               AND submission_ends_at <= $1
             ORDER BY submission_ends_at"
        ))
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }

    /// Rounds still voting whose voting deadline has passed.
    pub async fn list_due_voting_close(&self, now: DateTime<Utc>) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(&format!(
            "SELECT {ROUND_COLUMNS} FROM rounds
             WHERE status = 'voting' AND voting_ends_at IS NOT NULL
               AND voting_ends_at <= $1
             ORDER BY voting_ends_at"
        ))
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }

    /// Revealed or archived rounds of a scope, in chronological order. Used
    /// by the rebuild path and the win-streak scan.
    pub async fn list_scored(
        &self,
        league_id: Uuid,
        season_id: Option<Uuid>,
    ) -> Result<Vec<Round>> {
        let rounds = match season_id {
            Some(season_id) => {
                sqlx::query_as::<_, Round>(&format!(
                    "SELECT {ROUND_COLUMNS} FROM rounds
                     WHERE league_id = $1 AND season_id = $2
                       AND status IN ('revealed', 'archived')
                     ORDER BY created_at"
                ))
                .bind(league_id)
                .bind(season_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Round>(&format!(
                    "SELECT {ROUND_COLUMNS} FROM rounds
                     WHERE league_id = $1 AND status IN ('revealed', 'archived')
                     ORDER BY created_at"
                ))
                .bind(league_id)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rounds)
    }

    /// Delete the round together with its submissions (and their votes, via
    /// cascade) as one unit.
    pub async fn delete_with_submissions(&self, round_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submissions WHERE round_id = $1")
            .bind(round_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM rounds WHERE round_id = $1")
            .bind(round_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
