use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{League, LeagueMember, MemberRole, Season, VotingConfig};

/// Request payload for creating a new league
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLeagueRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Slug must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[serde(default)]
    pub voting_config: VotingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    pub user_id: Uuid,

    #[serde(default = "default_role")]
    pub role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSeasonRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(range(min = 1))]
    pub ordinal: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueResponse {
    pub league_id: Uuid,
    pub name: String,
    pub slug: String,
    pub voting_config: VotingConfig,
    pub created_at: DateTime<Utc>,
}

impl From<League> for LeagueResponse {
    fn from(league: League) -> Self {
        Self {
            league_id: league.league_id,
            name: league.name,
            slug: league.slug,
            voting_config: league.voting_config.0,
            created_at: league.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub league_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl From<LeagueMember> for MemberResponse {
    fn from(member: LeagueMember) -> Self {
        Self {
            league_id: member.league_id,
            user_id: member.user_id,
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonResponse {
    pub season_id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub ordinal: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Season> for SeasonResponse {
    fn from(season: Season) -> Self {
        Self {
            season_id: season.season_id,
            league_id: season.league_id,
            name: season.name,
            ordinal: season.ordinal,
            created_at: season.created_at,
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new(
            "slug must contain only lowercase letters, digits, and hyphens",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("friday-bangers-22").is_ok());
        assert!(validate_slug("No Spaces").is_err());
        assert!(validate_slug("UPPER").is_err());
    }
}
