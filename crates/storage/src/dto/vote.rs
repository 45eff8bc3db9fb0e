use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::VoteKind;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteEntryRequest {
    pub submission_id: Uuid,
    pub points: i32,
    pub kind: VoteKind,
}

/// A user's full vote set for one round. Submitting replaces any previous
/// set atomically.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VoteBatchRequest {
    pub voter_id: Uuid,

    #[validate(length(max = 100, message = "Too many votes in one batch"))]
    pub votes: Vec<VoteEntryRequest>,
}
