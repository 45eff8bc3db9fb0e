use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Season {
    pub season_id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub ordinal: i32,
    pub created_at: DateTime<Utc>,
}
