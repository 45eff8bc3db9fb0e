use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "vote_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

/// A signed point value one user assigned to one submission. A voter's full
/// set for a round is only ever replaced as a single unit.
#[derive(Debug, Clone, FromRow)]
pub struct Vote {
    pub round_id: Uuid,
    pub voter_id: Uuid,
    pub submission_id: Uuid,
    pub points: i32,
    pub kind: VoteKind,
}
