//! The acting user.
//!
//! Operations never read session state; the caller hands them an
//! [`ActorContext`] built from whatever identity provider is in front.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use triage_db::model::user::User;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone())
    }
}

/// Identity of the caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorContext {
    /// Authenticated user
    Authenticated(Actor),
    /// No identity could be established
    Anonymous,
}

impl ActorContext {
    /// ## Summary
    /// Returns the authenticated actor.
    ///
    /// ## Errors
    /// Returns `NotAuthenticated` for an anonymous caller.
    pub const fn require(&self) -> ServiceResult<&Actor> {
        match self {
            Self::Authenticated(actor) => Ok(actor),
            Self::Anonymous => Err(ServiceError::NotAuthenticated),
        }
    }

    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Authenticated(actor) => Some(actor),
            Self::Anonymous => None,
        }
    }
}

impl From<Actor> for ActorContext {
    fn from(actor: Actor) -> Self {
        Self::Authenticated(actor)
    }
}
