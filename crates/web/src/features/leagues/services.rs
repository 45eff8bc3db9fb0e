use sqlx::PgPool;
use storage::{
    dto::league::{AddMemberRequest, CreateLeagueRequest, CreateSeasonRequest},
    error::Result,
    models::{League, LeagueMember, Season},
    repository::league::LeagueRepository,
};

/// List all leagues
pub async fn list_leagues(pool: &PgPool) -> Result<Vec<League>> {
    let repo = LeagueRepository::new(pool);
    repo.list().await
}

/// Get league by id
pub async fn get_league(pool: &PgPool, league_id: uuid::Uuid) -> Result<League> {
    let repo = LeagueRepository::new(pool);
    repo.find_by_id(league_id).await
}

/// Create a new league
pub async fn create_league(pool: &PgPool, request: &CreateLeagueRequest) -> Result<League> {
    let repo = LeagueRepository::new(pool);
    repo.create(request).await
}

/// Add a member to a league
pub async fn add_member(
    pool: &PgPool,
    league_id: uuid::Uuid,
    request: &AddMemberRequest,
) -> Result<LeagueMember> {
    let repo = LeagueRepository::new(pool);
    repo.find_by_id(league_id).await?;
    repo.add_member(league_id, request).await
}

/// Create a season within a league
pub async fn create_season(
    pool: &PgPool,
    league_id: uuid::Uuid,
    request: &CreateSeasonRequest,
) -> Result<Season> {
    let repo = LeagueRepository::new(pool);
    repo.find_by_id(league_id).await?;
    repo.create_season(league_id, request).await
}
