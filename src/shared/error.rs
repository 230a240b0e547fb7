//! Application Error Types
//!
//! Centralized error taxonomy shared by every store implementation.
//! Driver errors are classified once, in the `From<sqlx::Error>` impl, so
//! callers see the same variants whether they run against PostgreSQL or the
//! in-memory store.

use sqlx::error::ErrorKind;

/// SQLSTATE raised by PostgreSQL when a value exceeds a `VARCHAR(n)` column.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Conflict: unique constraint {0} violated")]
    Conflict(String),

    /// A foreign key pointed at a missing row. Carries the constraint name.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Any other schema-level rejection (length, not-null, check).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    /// Whether this error is a uniqueness violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// Name of the violated constraint, when the store reported one.
    ///
    /// Request handlers use this to tell "username taken" from "email taken".
    pub fn constraint(&self) -> Option<&str> {
        match self {
            AppError::Conflict(name) | AppError::ForeignKeyViolation(name) => Some(name),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            match db_err.kind() {
                ErrorKind::UniqueViolation => return AppError::Conflict(constraint),
                ErrorKind::ForeignKeyViolation => {
                    return AppError::ForeignKeyViolation(constraint)
                }
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    return AppError::ConstraintViolation(db_err.message().to_string())
                }
                _ => {}
            }

            if db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION) {
                return AppError::ConstraintViolation(db_err.message().to_string());
            }
        }

        AppError::Database(err)
    }
}
