//! Normalized errors returned by every repository operation.

use sea_orm::{DbErr, SqlErr};

/// Errors raised by the repository layer.
///
/// Store-level failures are classified once, when they leave the generic
/// repository, so callers can tell a blocked delete apart from a dropped
/// connection without inspecting driver error codes.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("No session provided. You must pass a valid session to perform database operations.")]
    MissingSession,

    #[error("No instance found for {entity} model with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: String,
        value: String,
    },

    #[error("The {entity} model does not have a field named {field}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Cannot {action} {entity} due to integrity constraints: {message}")]
    Integrity {
        entity: &'static str,
        action: String,
        message: String,
    },

    #[error("Failed to {action} for {entity} model: {source}")]
    Store {
        entity: &'static str,
        action: String,
        #[source]
        source: DbErr,
    },
}

impl RepositoryError {
    /// Classify a store error raised while performing `action` on `entity`.
    pub fn from_db(entity: &'static str, action: impl Into<String>, err: DbErr) -> Self {
        let action = action.into();
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => Self::Integrity {
                entity,
                action,
                message,
            },
            _ => Self::Store {
                entity,
                action,
                source: err,
            },
        }
    }

    pub fn not_found(entity: &'static str, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
