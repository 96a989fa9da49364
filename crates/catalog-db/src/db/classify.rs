use catalog_core::AppError;
use sqlx::Error as SqlxError;

/// Caller-facing text for each constraint a write can trip.
#[derive(Debug, Clone, Copy)]
pub struct ViolationMessages {
    pub unique: &'static str,
    pub foreign_key: &'static str,
    pub check: &'static str,
}

/// Map constraint violations to `Conflict`/`Validation`; everything else stays a
/// database (storage) error.
pub fn classify_violation(err: SqlxError, messages: ViolationMessages) -> AppError {
    if let SqlxError::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(messages.unique.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(messages.foreign_key.to_string());
        }
        if db_err.is_check_violation() {
            return AppError::Validation(messages.check.to_string());
        }
    }
    AppError::Database(err)
}
