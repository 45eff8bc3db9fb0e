use sqlx::PgPool;
use storage::{
    dto::stats::UserStatisticsResponse,
    error::Result,
    repository::user_statistic::UserStatisticRepository,
    services::user_stats,
};
use uuid::Uuid;

/// Stored statistics row plus the derived win streak for one user in a scope.
pub async fn get_user_statistics(
    pool: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
    user_id: Uuid,
) -> Result<UserStatisticsResponse> {
    let stat = UserStatisticRepository::new(pool)
        .find(league_id, season_id, user_id)
        .await?;

    let win_streak = user_stats::win_streak(pool, league_id, season_id, user_id).await?;

    Ok(UserStatisticsResponse::from_statistic(stat, win_streak))
}
