use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::MemberRole;
use crate::repository::league::LeagueRepository;

/// Authorization gate: the acting user must be a member of the league.
/// Account management itself lives outside this service; only the
/// (league, user) -> role lookup is consulted here.
pub async fn require_member(
    pool: &PgPool,
    league_id: Uuid,
    user_id: Uuid,
) -> DomainResult<MemberRole> {
    let repo = LeagueRepository::new(pool);
    let role = repo.find_member(league_id, user_id).await?;
    role.ok_or(DomainError::Forbidden)
}
