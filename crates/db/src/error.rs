use hzrdr_core::error::CoreError;

/// Failure of an operation that validates domain input before touching the database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}
