//! Role resolution.
//!
//! The membership table is the only source of truth for "is this user a
//! member, and with what role". Every operation reads it afresh.

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use triage_db::{db::enums::Role, store::Store};

/// ## Summary
/// Resolves the role `actor_id` holds in `project_id`.
///
/// Returns `Ok(None)` when the user is not a member. The lookup has no side
/// effects.
///
/// ## Errors
/// Returns `StoreUnavailable` if the membership lookup cannot complete.
#[tracing::instrument(skip(store))]
pub async fn resolve_role(
    store: &dyn Store,
    actor_id: Uuid,
    project_id: Uuid,
) -> ServiceResult<Option<Role>> {
    let membership = store
        .membership_for(project_id, actor_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Role lookup failed");
            ServiceError::StoreUnavailable(e.to_string())
        })?;

    let role = membership.map(|m| m.role);
    tracing::debug!(role = ?role, "Role resolved");
    Ok(role)
}
