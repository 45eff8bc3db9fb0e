use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One track entered into a round. At most one per (round, user), enforced
/// by a unique index.
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub submission_id: Uuid,
    pub round_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub artist: String,
    /// Identifier understood by the catalog collaborator, used for
    /// best-effort genre lookups.
    pub provider_track_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
