use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to hand back to a client. Storage and configuration
    /// failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Config(_) | AppError::Internal(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::Database(DatabaseError::NotFound),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Database(DatabaseError::Duplicate)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                AppError::Database(DatabaseError::ConnectionError(err.to_string()))
            }
            _ => AppError::Database(DatabaseError::QueryError(err.to_string())),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::MigrationError(err.to_string()))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

// Every error reaching a handler's caller collapses to 422 with an `error` body.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            tracing::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

/// Failure of a register or login call. Rendered as `{"message": ...}`.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct CredentialError(#[from] pub AppError);

impl ResponseError for CredentialError {
    fn error_response(&self) -> HttpResponse {
        if self.0.is_internal() {
            tracing::error!("Credential request failed: {}", self.0);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.0.public_message()
        }))
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

/// Rejection raised by the identity extractor on protected routes.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct IdentityRejection(#[from] pub AppError);

impl ResponseError for IdentityRejection {
    fn error_response(&self) -> HttpResponse {
        if self.0.is_internal() {
            tracing::error!("Identity resolution failed: {}", self.0);
        }
        let message = match self.0 {
            AppError::Auth(_) => "Unauthorized".to_string(),
            _ => self.0.public_message(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unable to find user {0}")]
    UserNotFound(String),

    #[error("Incorrect password for user {0}")]
    IncorrectPassword(String),

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token does not match any user")]
    UnknownIdentity,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Internal(_)));

        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));

        let db_err = sqlx::Error::RowNotFound;
        let app_err: AppError = db_err.into();
        assert!(matches!(app_err, AppError::Database(DatabaseError::NotFound)));

        let db_err = sqlx::Error::PoolTimedOut;
        let app_err: AppError = db_err.into();
        assert!(matches!(app_err, AppError::Database(DatabaseError::ConnectionError(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::Auth(AuthError::IncorrectPassword("alice".into()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::NotFound("missing".into());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = CredentialError(AppError::Conflict("taken".into()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = IdentityRejection(AppError::Auth(AuthError::TokenExpired));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = IdentityRejection(AppError::Database(DatabaseError::QueryError("boom".into())));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Validation("Missing username".to_string());
        assert_eq!(err.to_string(), "Missing username");

        let err = AppError::Auth(AuthError::UserNotFound("bob".into()));
        assert_eq!(err.to_string(), "Unable to find user bob");

        let err = AppError::Database(DatabaseError::NotFound);
        assert_eq!(err.to_string(), "Database error: Record not found");
    }

    #[test]
    fn test_public_message_hides_internals() {
        let err = AppError::Database(DatabaseError::QueryError("relation users does not exist".into()));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Conflict("User name already taken".into());
        assert_eq!(err.public_message(), "User name already taken");
    }
}
