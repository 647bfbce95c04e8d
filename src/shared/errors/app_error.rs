use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lifecycle rule violation. The message is shown to callers verbatim.
    #[error("{0}")]
    ValidationError(String),
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                AppError::NotFound("Record not found in database".to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                AppError::AlreadyExists(info.message().to_string())
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::DatabaseError(format!("Database pool error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Blocking task failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl AppError {
    /// The bare message, without the variant prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(m)
            | AppError::NotFound(m)
            | AppError::AlreadyExists(m)
            | AppError::InvalidInput(m)
            | AppError::Unauthorized(m)
            | AppError::InternalError(m)
            | AppError::SerializationError(m)
            | AppError::ValidationError(m) => m,
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_message_verbatim() {
        let err = AppError::ValidationError("Cow is not allowed to be Male".to_string());
        assert_eq!(err.to_string(), "Cow is not allowed to be Male");
        assert_eq!(err.message(), "Cow is not allowed to be Male");
    }

    #[test]
    fn other_variants_keep_their_prefix() {
        let err = AppError::NotFound("Bovine with tag 12 doesn't exist".to_string());
        assert_eq!(err.to_string(), "Not found: Bovine with tag 12 doesn't exist");
        assert_eq!(err.message(), "Bovine with tag 12 doesn't exist");
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err: AppError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = AppError::AlreadyExists("The batch with name lote_1 already exists".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "AlreadyExists");
        assert_eq!(json["message"], "The batch with name lote_1 already exists");
    }
}
