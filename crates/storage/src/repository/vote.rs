use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Vote;
use crate::services::vote_validation::VoteInput;

pub struct VoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_round(&self, round_id: Uuid) -> Result<Vec<Vote>> {
        let votes = sqlx::query_as::<_, Vote>(
            "SELECT round_id, voter_id, submission_id, points, kind
             FROM votes WHERE round_id = $1",
        )
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(votes)
    }

    /// Replace the voter's entire vote set for the round as one transaction.
    /// Readers never observe the old set partially removed or the new one
    /// partially inserted.
    pub async fn replace_for_voter(
        &self,
        round_id: Uuid,
        voter_id: Uuid,
        batch: &[VoteInput],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM votes WHERE round_id = $1 AND voter_id = $2")
            .bind(round_id)
            .bind(voter_id)
            .execute(&mut *tx)
            .await?;

        for vote in batch {
            sqlx::query(
                "INSERT INTO votes (round_id, voter_id, submission_id, points, kind)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(round_id)
            .bind(voter_id)
            .bind(vote.submission_id)
            .bind(vote.points)
            .bind(vote.kind)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
