use thiserror::Error;

use crate::models::RoundStatus;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }
}

/// One violated voting rule. Variants mirror the rule order in
/// `services::vote_validation` so callers learn exactly which rule the
/// batch broke.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteValidationError {
    #[error("Vote references submission {0} which is not part of this round")]
    UnknownSubmission(uuid::Uuid),

    #[error("Voting for your own submission is not allowed in this league")]
    SelfVoteForbidden,

    #[error("Batch contains {got} upvotes but the limit is {max}")]
    TooManyUpvotes { got: usize, max: u32 },

    #[error("Batch contains {got} downvotes but the limit is {max}")]
    TooManyDownvotes { got: usize, max: u32 },

    #[error("Downvoting is disabled in this league")]
    DownvotingDisabled,

    #[error("Point value {0} is not allowed by the voting rules")]
    InvalidPointValue(i32),

    #[error("Assigned point values do not match the configured {kind} sequence")]
    PointSequenceMismatch { kind: &'static str },

    #[error("Round is not accepting votes in its current state")]
    RoundNotVoting,

    #[error("The voting deadline for this round has passed")]
    DeadlinePassed,
}

/// Caller-visible failures of the core operations. Everything here is
/// synchronous and leaves no partial effect; best-effort pipeline failures
/// travel as `RevealWarning`s instead of surfacing here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] VoteValidationError),

    #[error("Cannot transition round from {from} to {to}")]
    InvalidTransition { from: RoundStatus, to: RoundStatus },

    #[error("Operation not allowed while round is {status}")]
    InvalidState { status: RoundStatus },

    #[error("User is not allowed to act in this league")]
    Forbidden,

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        DomainError::Storage(StorageError::from(e))
    }
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::Storage(StorageError::NotFound))
    }
}
