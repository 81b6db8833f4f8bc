use serde::Deserialize;
use uuid::Uuid;

use super::MutationService;
use crate::auth::{ActorContext, policy};
use crate::error::{ServiceError, ServiceResult};
use triage_core::{types::ResourceKind, util::validate};
use triage_db::{
    db::enums::CommentVisibility,
    model::comment::{Comment, NewComment},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
    #[serde(default)]
    pub visibility: Option<CommentVisibility>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub body: String,
}

impl MutationService {
    /// ## Summary
    /// Adds a comment authored by the actor to a ticket.
    ///
    /// ## Errors
    /// Returns `Forbidden` for non-members and for Customers requesting an
    /// internal comment.
    #[tracing::instrument(skip(self, actor, request))]
    pub async fn create_comment(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
        request: CreateComment,
    ) -> ServiceResult<Comment> {
        let actor = actor.require()?;
        let ticket = self.load_ticket(ticket_id).await?;
        let role = self.role_in(actor, ticket.project_id).await?;
        let CreateComment { body, visibility } = request;
        let visibility = policy::can_create_comment(role, visibility).require()?;

        let comment = self
            .store
            .insert_comment(NewComment {
                ticket_id: ticket.id,
                author_id: actor.user_id,
                body: validate::non_empty("body", &body)?,
                visibility,
            })
            .await?;

        tracing::info!(comment_id = %comment.id, %visibility, "Comment created");
        self.signal(ResourceKind::Ticket, Some(ticket.id));
        Ok(comment)
    }

    /// ## Summary
    /// Replaces the body of the actor's own comment.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor wrote the comment.
    #[tracing::instrument(skip(self, actor, request))]
    pub async fn update_comment(
        &self,
        actor: &ActorContext,
        comment_id: Uuid,
        request: UpdateComment,
    ) -> ServiceResult<Comment> {
        let actor = actor.require()?;
        let comment = self.load_comment(comment_id).await?;
        policy::can_edit_comment(actor.user_id, &comment).require()?;

        let UpdateComment { body } = request;
        let body = validate::non_empty("body", &body)?;
        let updated = self
            .store
            .update_comment_body(comment.id, body)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id))?;

        tracing::info!(comment_id = %updated.id, "Comment updated");
        self.signal(ResourceKind::Ticket, Some(updated.ticket_id));
        Ok(updated)
    }

    /// ## Summary
    /// Deletes a comment.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor wrote the comment or administers
    /// the project.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_comment(&self, actor: &ActorContext, comment_id: Uuid) -> ServiceResult<()> {
        let actor = actor.require()?;
        let comment = self.load_comment(comment_id).await?;
        let ticket = self.load_ticket(comment.ticket_id).await?;
        let role = self.role_in(actor, ticket.project_id).await?;
        policy::can_delete_comment(actor.user_id, role, &comment).require()?;

        if !self.store.delete_comment(comment.id).await? {
            return Err(ServiceError::not_found("Comment", comment_id));
        }

        tracing::info!(comment_id = %comment.id, "Comment deleted");
        self.signal(ResourceKind::Ticket, Some(ticket.id));
        Ok(())
    }
}
