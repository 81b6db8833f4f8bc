use serde::Deserialize;
use uuid::Uuid;

use super::MutationService;
use crate::auth::{ActorContext, policy};
use crate::error::{ServiceError, ServiceResult};
use triage_core::{types::ResourceKind, util::validate};
use triage_db::{
    db::enums::Role,
    model::membership::{Membership, NewMembership},
};

#[derive(Debug, Clone, Deserialize)]
pub struct AddMember {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateMemberRole {
    pub role: Role,
}

impl MutationService {
    /// ## Summary
    /// Adds the user with the given email to a project.
    ///
    /// ## Errors
    /// Returns `NotFound` if no user has the email, `Forbidden` unless the
    /// actor administers the project, and `StoreError` if the user already
    /// is a member.
    #[tracing::instrument(skip(self, actor, request), fields(role = %request.role))]
    pub async fn add_member(
        &self,
        actor: &ActorContext,
        project_id: Uuid,
        request: AddMember,
    ) -> ServiceResult<Membership> {
        let actor = actor.require()?;
        let project = self.load_project(project_id).await?;
        let role = self.role_in(actor, project.id).await?;
        policy::can_manage_project(role).require()?;

        let AddMember {
            email,
            role: granted,
        } = request;
        let email = validate::non_empty("email", &email)?;
        let user = self
            .store
            .user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {email}")))?;

        let membership = self
            .store
            .insert_membership(NewMembership {
                project_id: project.id,
                user_id: user.id,
                role: granted,
            })
            .await?;

        tracing::info!(
            membership_id = %membership.id,
            user_id = %user.id,
            role = %membership.role,
            "Member added"
        );
        self.signal(ResourceKind::Project, Some(project.id));
        Ok(membership)
    }

    /// ## Summary
    /// Changes the role of an existing membership.
    ///
    /// Demoting the last Administrator is allowed; it is logged as a warning.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor administers the project.
    #[tracing::instrument(skip(self, actor), fields(role = %request.role))]
    pub async fn update_member_role(
        &self,
        actor: &ActorContext,
        membership_id: Uuid,
        request: UpdateMemberRole,
    ) -> ServiceResult<Membership> {
        let actor = actor.require()?;
        let membership = self.load_membership(membership_id).await?;
        let role = self.role_in(actor, membership.project_id).await?;
        policy::can_manage_project(role).require()?;

        let updated = self
            .store
            .update_membership_role(membership.id, request.role)
            .await?
            .ok_or_else(|| ServiceError::not_found("Membership", membership_id))?;

        tracing::info!(membership_id = %updated.id, role = %updated.role, "Member role updated");
        if membership.role.is_administrator() && !updated.role.is_administrator() {
            self.warn_if_no_administrator(updated.project_id).await;
        }
        self.signal(ResourceKind::Project, Some(updated.project_id));
        Ok(updated)
    }

    /// ## Summary
    /// Removes a membership.
    ///
    /// Removing the last Administrator is allowed; it is logged as a warning.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor administers the project.
    #[tracing::instrument(skip(self, actor))]
    pub async fn remove_member(&self, actor: &ActorContext, membership_id: Uuid) -> ServiceResult<()> {
        let actor = actor.require()?;
        let membership = self.load_membership(membership_id).await?;
        let role = self.role_in(actor, membership.project_id).await?;
        policy::can_manage_project(role).require()?;

        if !self.store.delete_membership(membership.id).await? {
            return Err(ServiceError::not_found("Membership", membership_id));
        }

        tracing::info!(membership_id = %membership.id, user_id = %membership.user_id, "Member removed");
        if membership.role.is_administrator() {
            self.warn_if_no_administrator(membership.project_id).await;
        }
        self.signal(ResourceKind::Project, Some(membership.project_id));
        Ok(())
    }

    /// The change already happened, so a failed count is only logged.
    async fn warn_if_no_administrator(&self, project_id: Uuid) {
        match self.store.memberships_for_project(project_id).await {
            Ok(members) if !members.iter().any(|m| m.role.is_administrator()) => {
                tracing::warn!(%project_id, "Project has no administrator left");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%project_id, error = %e, "Could not count administrators"),
        }
    }
}
