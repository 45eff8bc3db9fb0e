use sqlx::PgPool;
use storage::{
    error::{DomainResult, Result},
    models::LeaderboardEntry,
    repository::leaderboard::LeaderboardRepository,
    services::leaderboard::{self, RebuildSummary},
    services::membership,
};
use uuid::Uuid;

/// Leaderboard entries for one scope, best standing first.
pub async fn get_leaderboard(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
) -> Result<Vec<LeaderboardEntry>> {
    let repo = LeaderboardRepository::new(pool);
    repo.list_scope(league_id, season_id).await
}

/// Recompute one scope's entries from scratch.
pub async fn rebuild(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
    round_ids: Option<Vec<Uuid>>,
    acting_user_id: Uuid,
) -> DomainResult<RebuildSummary> {
    membership::require_member(pool, league_id, acting_user_id).await?;

    leaderboard::rebuild(pool, league_id, season_id, round_ids).await
}
