//! Translation of SQLx failures into domain errors
//!
//! Only violations of the constraints named here carry domain meaning. Any
//! other failure, including an unrelated unique or foreign key violation,
//! surfaces as a database error.

use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;
use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;

/// UNIQUE on `accounts.email`
pub(crate) const ACCOUNTS_EMAIL_KEY: &str = "accounts_email_key";

/// `songs.created_by` REFERENCES `accounts`; violated when a purge wins the
/// race against a song insert
pub(crate) const SONGS_OWNER_FKEY: &str = "songs_created_by_fkey";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a failed insert of a row that belongs to `account_id`
pub fn map_insert_error(e: SqlxError, account_id: AccountId) -> DomainError {
    let known = e
        .as_database_error()
        .and_then(|db| constraint_error(db.kind(), db.constraint(), account_id));
    match known {
        Some(err) => err,
        None => map_db_error(e),
    }
}

fn constraint_error(
    kind: ErrorKind,
    constraint: Option<&str>,
    account_id: AccountId,
) -> Option<DomainError> {
    match (kind, constraint?) {
        (ErrorKind::UniqueViolation, ACCOUNTS_EMAIL_KEY) => {
            Some(DomainError::EmailAlreadyExists)
        }
        (ErrorKind::ForeignKeyViolation, SONGS_OWNER_FKEY) => {
            Some(DomainError::AccountNotFound(account_id))
        }
        _ => None,
    }
}
