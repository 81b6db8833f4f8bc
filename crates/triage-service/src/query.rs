//! Membership-gated reads.
//!
//! Reads go through the same role lookup as writes, so a view never shows
//! what the policy would hide.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::{ActorContext, policy, resolve_role};
use crate::error::{ServiceError, ServiceResult};
use triage_db::{
    db::enums::Role,
    model::{
        comment::Comment,
        membership::Membership,
        project::{Project, ProjectWithRole},
        ticket::Ticket,
    },
    store::Store,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub project: Project,
    pub role: Role,
    pub tickets: Vec<Ticket>,
    pub members: Vec<Membership>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub role: Role,
    /// Oldest first, restricted to what `role` may see.
    pub comments: Vec<Comment>,
}

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn Store>,
}

impl QueryService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Returns the project's role for a member, `Forbidden` otherwise.
    async fn member_role(&self, actor_id: Uuid, project_id: Uuid) -> ServiceResult<Role> {
        resolve_role(self.store.as_ref(), actor_id, project_id)
            .await?
            .ok_or_else(|| ServiceError::forbidden("You are not a member of this project"))
    }

    /// ## Summary
    /// Lists the projects the actor belongs to, newest first.
    ///
    /// ## Errors
    /// Returns `NotAuthenticated` for an anonymous caller.
    #[tracing::instrument(skip(self, actor))]
    pub async fn list_projects(&self, actor: &ActorContext) -> ServiceResult<Vec<ProjectWithRole>> {
        let actor = actor.require()?;
        Ok(self.store.projects_for_user(actor.user_id).await?)
    }

    /// ## Summary
    /// Returns a project with its tickets and members.
    ///
    /// ## Errors
    /// Returns `NotFound` for an unknown project and `Forbidden` for
    /// non-members.
    #[tracing::instrument(skip(self, actor))]
    pub async fn project_overview(
        &self,
        actor: &ActorContext,
        project_id: Uuid,
    ) -> ServiceResult<ProjectOverview> {
        let actor = actor.require()?;
        let project = self
            .store
            .project_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;
        let role = self.member_role(actor.user_id, project.id).await?;

        let (tickets, members) = futures::try_join!(
            self.store.tickets_for_project(project.id),
            self.store.memberships_for_project(project.id),
        )?;

        Ok(ProjectOverview {
            project,
            role,
            tickets,
            members,
        })
    }

    /// ## Summary
    /// Returns a ticket with the comments the actor may see.
    ///
    /// ## Errors
    /// Returns `NotFound` for an unknown ticket and `Forbidden` for
    /// non-members of its project.
    #[tracing::instrument(skip(self, actor))]
    pub async fn ticket_detail(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
    ) -> ServiceResult<TicketDetail> {
        let actor = actor.require()?;
        let ticket = self
            .store
            .ticket_by_id(ticket_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Ticket", ticket_id))?;
        let role = self.member_role(actor.user_id, ticket.project_id).await?;

        let comments = self
            .store
            .comments_for_ticket(ticket.id)
            .await?
            .into_iter()
            .filter(|comment| policy::can_view_comment(Some(role), comment))
            .collect();

        Ok(TicketDetail {
            ticket,
            role,
            comments,
        })
    }
}
