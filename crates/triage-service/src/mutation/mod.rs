//! Write operations.
//!
//! Every operation follows the same steps: require an authenticated actor,
//! fetch the context the decision needs, resolve the actor's role, consult
//! the policy, apply the permitted change, then signal stale views. A failure
//! at any step aborts the operation and emits no signal.

pub mod comment;
pub mod membership;
pub mod project;
pub mod ticket;

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{Actor, resolve_role};
use crate::error::{ServiceError, ServiceResult};
use crate::invalidate::Invalidator;
use triage_core::types::ResourceKind;
use triage_db::{
    db::enums::Role,
    model::{comment::Comment, membership::Membership, project::Project, ticket::Ticket},
    store::Store,
};

pub use comment::{CreateComment, UpdateComment};
pub use membership::{AddMember, UpdateMemberRole};
pub use project::{CreateProject, UpdateProject};
pub use ticket::{ChangeTicketStatus, CreateTicket, TicketUpdate, TicketUpdateOutcome};

/// Orchestrates writes against a [`Store`].
#[derive(Clone)]
pub struct MutationService {
    store: Arc<dyn Store>,
    invalidator: Arc<dyn Invalidator>,
}

impl MutationService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, invalidator: Arc<dyn Invalidator>) -> Self {
        Self { store, invalidator }
    }

    async fn role_in(&self, actor: &Actor, project_id: Uuid) -> ServiceResult<Option<Role>> {
        resolve_role(self.store.as_ref(), actor.user_id, project_id).await
    }

    async fn load_project(&self, id: Uuid) -> ServiceResult<Project> {
        self.store
            .project_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))
    }

    async fn load_membership(&self, id: Uuid) -> ServiceResult<Membership> {
        self.store
            .membership_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Membership", id))
    }

    async fn load_ticket(&self, id: Uuid) -> ServiceResult<Ticket> {
        self.store
            .ticket_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Ticket", id))
    }

    async fn load_comment(&self, id: Uuid) -> ServiceResult<Comment> {
        self.store
            .comment_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", id))
    }

    /// Rejects an assignee who holds no membership in `project_id`.
    async fn ensure_assignable(&self, project_id: Uuid, assignee: Option<Uuid>) -> ServiceResult<()> {
        let Some(assignee_id) = assignee else {
            return Ok(());
        };

        if self.store.membership_for(project_id, assignee_id).await?.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "Assignee {assignee_id} is not a member of this project"
            )));
        }
        Ok(())
    }

    fn signal(&self, kind: ResourceKind, id: Option<Uuid>) {
        self.invalidator.invalidate(kind, id);
    }
}
