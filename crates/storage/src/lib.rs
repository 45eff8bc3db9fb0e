pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use db::Database;
pub use error::{DomainError, DomainResult, StorageError, VoteValidationError};
