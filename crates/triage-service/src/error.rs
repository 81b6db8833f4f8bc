use serde::Serialize;
use thiserror::Error;

use triage_db::error::DbError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] DbError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The project row was written but the creator's administrator
    /// membership was not. The project persists and needs manual
    /// reconciliation.
    #[error(
        "Store error: project {project_id} was created but the administrator membership could not be granted: {source}"
    )]
    ProjectPartiallyCreated {
        project_id: uuid::Uuid,
        source: DbError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl From<triage_core::error::CoreError> for ServiceError {
    fn from(err: triage_core::error::CoreError) -> Self {
        use triage_core::error::CoreError;

        match err {
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
            CoreError::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
            CoreError::InvariantViolation(msg) => Self::InvariantViolation(msg),
        }
    }
}

/// Stable failure category the presentation layer renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Unauthenticated,
    NotFound,
    Forbidden,
    Validation,
    StoreError,
    StoreUnavailable,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation",
            Self::StoreError => "store_error",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl ServiceError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAuthenticated => ErrorCategory::Unauthenticated,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Forbidden(_) => ErrorCategory::Forbidden,
            Self::ValidationError(_) => ErrorCategory::Validation,
            Self::StoreUnavailable(_) => ErrorCategory::StoreUnavailable,
            Self::StoreError(err) if err.is_unavailable() => ErrorCategory::StoreUnavailable,
            Self::StoreError(_)
            | Self::ProjectPartiallyCreated { .. }
            | Self::InvalidConfiguration(_)
            | Self::InvariantViolation(_) => ErrorCategory::StoreError,
        }
    }

    pub(crate) fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub(crate) fn not_found(what: &str, id: uuid::Uuid) -> Self {
        Self::NotFound(format!("{what} {id}"))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
