//! SQLite row conversion and error mapping helpers.

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

/// Map a sqlx error to `RepoError`, turning unique-constraint failures into
/// `ConstraintViolation` with the message produced by `on_unique`.
pub(super) fn map_write_error(
    operation: &'static str,
    error: sqlx::Error,
    on_unique: impl FnOnce(&str) -> String,
) -> RepoError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return RepoError::constraint(on_unique(db.message()));
        }
    }
    RepoError::database(operation, error)
}

/// Whether a sqlx error is a foreign key failure (a referenced row is gone).
pub(super) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Extension trait for `SqliteRow` to keep the row-to-entity functions short.
pub(super) trait RowExt {
    fn text(&self, field: &str) -> Result<String, RepoError>;
    fn optional_text(&self, field: &str) -> Result<Option<String>, RepoError>;
    fn int(&self, field: &str) -> Result<i64, RepoError>;
    fn uuid(&self, field: &str) -> Result<Uuid, RepoError>;
    fn fixed_datetime(&self, field: &str) -> Result<DateTime<FixedOffset>, RepoError>;
    fn utc_datetime(&self, field: &str) -> Result<DateTime<Utc>, RepoError>;
}

impl RowExt for SqliteRow {
    fn text(&self, field: &str) -> Result<String, RepoError> {
        self.try_get::<String, _>(field)
            .map_err(|e| RepoError::serialization(format!("{}: {}", field, e)))
    }

    fn optional_text(&self, field: &str) -> Result<Option<String>, RepoError> {
        self.try_get::<Option<String>, _>(field)
            .map_err(|e| RepoError::serialization(format!("{}: {}", field, e)))
    }

    fn int(&self, field: &str) -> Result<i64, RepoError> {
        self.try_get::<i64, _>(field)
            .map_err(|e| RepoError::serialization(format!("{}: {}", field, e)))
    }

    fn uuid(&self, field: &str) -> Result<Uuid, RepoError> {
        let raw = self.text(field)?;
        Uuid::parse_str(&raw)
            .map_err(|e| RepoError::serialization(format!("{} '{}': {}", field, raw, e)))
    }

    fn fixed_datetime(&self, field: &str) -> Result<DateTime<FixedOffset>, RepoError> {
        let raw = self.text(field)?;
        DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| RepoError::serialization(format!("{} '{}': {}", field, raw, e)))
    }

    fn utc_datetime(&self, field: &str) -> Result<DateTime<Utc>, RepoError> {
        Ok(self.fixed_datetime(field)?.with_timezone(&Utc))
    }
}
