pub mod hooks;
pub mod leaderboard;
pub mod membership;
pub mod round_lifecycle;
pub mod scoring;
pub mod user_stats;
pub mod vote_validation;
pub mod voting;

use serde::Serialize;
use utoipa::ToSchema;

/// A non-fatal failure of a best-effort step. Warnings ride alongside the
/// primary success value instead of failing the operation; aggregate drift
/// they describe is repaired via the leaderboard rebuild.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RevealWarning {
    pub stage: &'static str,
    pub message: String,
}

impl RevealWarning {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}
