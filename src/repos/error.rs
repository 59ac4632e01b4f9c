/*
 * Responsibility
 * - what a repo reports upward
 * - unique-key violations are surfaced as `Duplicate`, whichever backend raised them
 */
use thiserror::Error;

/// User column with a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Login,
    Email,
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate value for unique field {0:?}")]
    Duplicate(UniqueField),
    #[error("db error")]
    Db(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            let field = match db.constraint() {
                Some(name) if name.contains("email") => UniqueField::Email,
                _ => UniqueField::Login,
            };
            return RepoError::Duplicate(field);
        }
        RepoError::Db(e)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
