use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::league::{AddMemberRequest, CreateLeagueRequest, CreateSeasonRequest};
use crate::error::{Result, StorageError};
use crate::models::{League, LeagueMember, MemberRole, Season};

const LEAGUE_COLUMNS: &str = "league_id, name, slug, voting_config, created_at";

/// Repository for league, membership, and season rows.
pub struct LeagueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &CreateLeagueRequest) -> Result<League> {
        let league = sqlx::query_as::<_, League>(&format!(
            "INSERT INTO leagues (name, slug, voting_config)
             VALUES ($1, $2, $3)
             RETURNING {LEAGUE_COLUMNS}"
        ))
        .bind(&req.name)
        .bind(&req.slug)
        .bind(Json(&req.voting_config))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let wrapped = StorageError::from(e);
            if wrapped.is_unique_violation() {
                StorageError::ConstraintViolation("Slug already exists".to_string())
            } else {
                wrapped
            }
        })?;

        Ok(league)
    }

    pub async fn find_by_id(&self, league_id: Uuid) -> Result<League> {
        let league = sqlx::query_as::<_, League>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE league_id = $1"
        ))
        .bind(league_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(league)
    }

    pub async fn list(&self) -> Result<Vec<League>> {
        let leagues = sqlx::query_as::<_, League>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(leagues)
    }

    pub async fn add_member(&self, league_id: Uuid, req: &AddMemberRequest) -> Result<LeagueMember> {
        let member = sqlx::query_as::<_, LeagueMember>(
            "INSERT INTO league_members (league_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING league_id, user_id, role, joined_at",
        )
        .bind(league_id)
        .bind(req.user_id)
        .bind(req.role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let wrapped = StorageError::from(e);
            if wrapped.is_unique_violation() {
                StorageError::ConstraintViolation("User is already a member".to_string())
            } else {
                wrapped
            }
        })?;

        Ok(member)
    }

    pub async fn find_member(&self, league_id: Uuid, user_id: Uuid) -> Result<Option<MemberRole>> {
        let role = sqlx::query_scalar::<_, MemberRole>(
            "SELECT role FROM league_members WHERE league_id = $1 AND user_id = $2",
        )
        .bind(league_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(role)
    }

    pub async fn create_season(&self, league_id: Uuid, req: &CreateSeasonRequest) -> Result<Season> {
        let season = sqlx::query_as::<_, Season>(
            "INSERT INTO seasons (league_id, name, ordinal)
             VALUES ($1, $2, $3)
             RETURNING season_id, league_id, name, ordinal, created_at",
        )
        .bind(league_id)
        .bind(&req.name)
        .bind(req.ordinal)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let wrapped = StorageError::from(e);
            if wrapped.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A season with this ordinal already exists".to_string(),
                )
            } else {
                wrapped
            }
        })?;

        Ok(season)
    }
}
