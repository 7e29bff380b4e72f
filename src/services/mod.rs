//! Storage-facing services: the upload directory and the SQLite repositories.

pub mod information_repository;
pub mod person_repository;
pub mod upload_service;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("information `{0}` not found")]
    InformationNotFound(i64),
    #[error("person `{0}` not found")]
    PersonNotFound(i64),
    #[error("referenced person `{0}` does not exist")]
    UnknownPerson(i64),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Return true if SQLx error indicates a foreign key constraint violation.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_uppercase().contains("FOREIGN KEY")
    )
}
