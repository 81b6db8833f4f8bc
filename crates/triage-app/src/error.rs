use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, async_trait};
use serde::Serialize;
use thiserror::Error;

use triage_db::error::DbError;
use triage_service::error::{ErrorCategory, ServiceError};

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] triage_core::error::CoreError),

    /// The request could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub category: &'static str,
}

impl AppError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ServiceError(err) => err.category(),
            Self::CoreError(triage_core::error::CoreError::ValidationError(_))
            | Self::BadRequest(_) => ErrorCategory::Validation,
            Self::CoreError(_) => ErrorCategory::StoreError,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(ServiceError::StoreError(DbError::ConstraintViolation(_))) => {
                StatusCode::CONFLICT
            }
            _ => match self.category() {
                ErrorCategory::Unauthenticated => StatusCode::UNAUTHORIZED,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCategory::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Message shown to the client. Store internals stay in the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ServiceError(ServiceError::StoreError(DbError::ConstraintViolation(_))) => {
                "The change conflicts with existing data".to_string()
            }
            Self::ServiceError(err @ ServiceError::ProjectPartiallyCreated { .. }) => {
                err.to_string()
            }
            _ => match self.category() {
                ErrorCategory::StoreError => "Internal server error".to_string(),
                ErrorCategory::StoreUnavailable => "Service temporarily unavailable".to_string(),
                ErrorCategory::Unauthenticated
                | ErrorCategory::NotFound
                | ErrorCategory::Forbidden
                | ErrorCategory::Validation => self.to_string(),
            },
        }
    }
}

#[async_trait]
impl salvo::Writer for AppError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse {
            error: self.public_message(),
            category: self.category().as_str(),
        }));
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
