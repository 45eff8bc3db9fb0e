use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::round::CreateSubmissionRequest;
use crate::error::{Result, StorageError};
use crate::models::Submission;

const SUBMISSION_COLUMNS: &str =
    "submission_id, round_id, user_id, title, artist, provider_track_id, created_at";

pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, round_id: Uuid, req: &CreateSubmissionRequest) -> Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (round_id, user_id, title, artist, provider_track_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(round_id)
        .bind(req.user_id)
        .bind(&req.title)
        .bind(&req.artist)
        .bind(&req.provider_track_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let wrapped = StorageError::from(e);
            if wrapped.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "User already has a submission in this round".to_string(),
                )
            } else {
                wrapped
            }
        })?;

        Ok(submission)
    }

    pub async fn list_by_round(&self, round_id: Uuid) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE round_id = $1 ORDER BY created_at"
        ))
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(submissions)
    }

    pub async fn list_by_user(&self, round_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE user_id = $1 AND round_id = ANY($2)
             ORDER BY created_at"
        ))
        .bind(user_id)
        .bind(round_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(submissions)
    }
}
