//! Verdicts returned by the authorization policy.

use crate::error::{ServiceError, ServiceResult};

/// Result of an authorization check.
///
/// `Allowed` carries whatever the policy granted: nothing for plain gates,
/// a field set for ticket updates, the effective visibility for comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzResult<T = ()> {
    /// Access is allowed.
    Allowed(T),
    /// Access is denied, with a reason fit to show the user.
    Denied(&'static str),
}

impl<T> AuthzResult<T> {
    /// Returns `true` if access is allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Convert to a `Result`, returning `Err(ServiceError::Forbidden)` if denied.
    ///
    /// ## Errors
    ///
    /// Returns `Forbidden` carrying the denial reason.
    pub fn require(self) -> ServiceResult<T> {
        match self {
            Self::Allowed(grant) => Ok(grant),
            Self::Denied(reason) => {
                tracing::warn!(reason, "Authorization denied");
                Err(ServiceError::Forbidden(reason.to_string()))
            }
        }
    }
}

impl AuthzResult {
    /// Allows when `condition` holds, otherwise denies with `reason`.
    #[must_use]
    pub const fn allow_if(condition: bool, reason: &'static str) -> Self {
        if condition {
            Self::Allowed(())
        } else {
            Self::Denied(reason)
        }
    }
}
