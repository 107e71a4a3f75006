use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt;

/// Failures raised at the storage boundary.
#[derive(Debug)]
pub enum PersistenceError {
    /// Storage could not be reached.
    Connection(String),
    /// A statement failed.
    Query(String),
    /// The database refused the write because of a constraint.
    Constraint(String),
    /// An insert reported zero affected rows.
    NoRowsAffected(String),
    /// The connection settings could not be turned into connect options.
    Config(String),
    Migration(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            PersistenceError::Query(msg) => write!(f, "Query failed: {}", msg),
            PersistenceError::Constraint(msg) => write!(f, "Constraint violated: {}", msg),
            PersistenceError::NoRowsAffected(msg) => write!(f, "No rows affected: {}", msg),
            PersistenceError::Config(msg) => write!(f, "Invalid database configuration: {}", msg),
            PersistenceError::Migration(msg) => write!(f, "Migration failed: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => PersistenceError::Connection(err.to_string()),
            sqlx::Error::Configuration(_) => PersistenceError::Config(err.to_string()),
            sqlx::Error::Migrate(_) => PersistenceError::Migration(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.constraint().is_some() => {
                PersistenceError::Constraint(err.to_string())
            }
            _ => PersistenceError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        PersistenceError::Migration(err.to_string())
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(ErrorResponse { error: msg.clone() }),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ErrorResponse { error: msg.clone() }),
        }
    }
}

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        error!("{}", err);
        match err {
            PersistenceError::Constraint(_) => AppError::Conflict(format!("DB Error: {}", err)),
            _ => AppError::InternalServerError(format!("DB Error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn io_errors_are_classified_as_connection_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = PersistenceError::from(sqlx::Error::Io(io));
        assert!(matches!(err, PersistenceError::Connection(_)));
    }

    #[test]
    fn row_not_found_is_a_query_failure() {
        let err = PersistenceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, PersistenceError::Query(_)));
    }

    #[test]
    fn persistence_errors_surface_as_500() {
        let err = AppError::from(PersistenceError::Connection("down".to_string()));
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("Connection failed: down"));
    }

    #[test]
    fn constraint_violations_surface_as_409() {
        let err = AppError::from(PersistenceError::Constraint("users_email_key".to_string()));
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn app_errors_map_to_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).error_response().status(), StatusCode::CONFLICT);
    }
}
