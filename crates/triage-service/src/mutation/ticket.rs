use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::MutationService;
use crate::auth::{ActorContext, FieldSet, TicketField, policy};
use crate::error::{ServiceError, ServiceResult};
use triage_core::{types::ResourceKind, util::validate};
use triage_db::{
    db::enums::{TicketPriority, TicketStatus},
    model::ticket::{NewTicket, Ticket, TicketChangeset},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChangeTicketStatus {
    pub status: TicketStatus,
}

/// A requested ticket update.
///
/// `None` means the field was not submitted. For nullable fields
/// `Some(None)` clears the value; in JSON that is an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TicketUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "submitted")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default, deserialize_with = "submitted")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "submitted")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Maps a present field, `null` included, to `Some`.
fn submitted<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TicketUpdate {
    #[must_use]
    pub fn submitted_fields(&self) -> FieldSet {
        let presence = [
            (TicketField::Title, self.title.is_some()),
            (TicketField::Description, self.description.is_some()),
            (TicketField::Status, self.status.is_some()),
            (TicketField::Priority, self.priority.is_some()),
            (TicketField::Assignee, self.assignee_id.is_some()),
            (TicketField::DueDate, self.due_date.is_some()),
        ];

        presence
            .into_iter()
            .filter(|(_, present)| *present)
            .fold(FieldSet::EMPTY, |set, (field, _)| set.with(field))
    }

    /// ## Summary
    /// Builds the changeset for the fields in `allowed`, dropping the rest.
    ///
    /// ## Errors
    /// Returns `ValidationError` if a kept title is blank.
    fn narrow(self, allowed: FieldSet) -> ServiceResult<TicketChangeset> {
        let keep = |field| allowed.contains(field);

        let title = match self.title.filter(|_| keep(TicketField::Title)) {
            Some(title) => Some(validate::non_empty("title", &title)?),
            None => None,
        };

        Ok(TicketChangeset {
            title,
            description: self
                .description
                .filter(|_| keep(TicketField::Description))
                .map(validate::optional_text),
            status: self.status.filter(|_| keep(TicketField::Status)),
            priority: self.priority.filter(|_| keep(TicketField::Priority)),
            assignee_id: self.assignee_id.filter(|_| keep(TicketField::Assignee)),
            due_date: self.due_date.filter(|_| keep(TicketField::DueDate)),
        })
    }
}

/// Result of a ticket update after field-narrowing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUpdateOutcome {
    pub ticket: Ticket,
    /// Submitted fields that were written.
    pub applied: FieldSet,
    /// Submitted fields outside the actor's scope, silently ignored.
    pub dropped: FieldSet,
}

impl MutationService {
    /// ## Summary
    /// Creates a ticket reported by the actor, in status Todo.
    ///
    /// ## Side Effects
    /// - Inserts a ticket row under the next key of its project
    /// - Signals the project and the new ticket as stale
    ///
    /// ## Errors
    /// Returns `Forbidden` for non-members and `Validation` for a blank
    /// title or an assignee who is not a project member.
    #[tracing::instrument(skip(self, actor, request))]
    pub async fn create_ticket(
        &self,
        actor: &ActorContext,
        project_id: Uuid,
        request: CreateTicket,
    ) -> ServiceResult<Ticket> {
        let actor = actor.require()?;
        let project = self.load_project(project_id).await?;
        let role = self.role_in(actor, project.id).await?;
        policy::can_create_ticket(role).require()?;

        let title = validate::non_empty("title", &request.title)?;
        self.ensure_assignable(project.id, request.assignee_id).await?;

        let ticket = self
            .store
            .insert_ticket(NewTicket {
                project_id: project.id,
                title,
                description: validate::optional_text(request.description),
                status: TicketStatus::Todo,
                priority: request.priority.unwrap_or_default(),
                assignee_id: request.assignee_id,
                reporter_id: actor.user_id,
                due_date: request.due_date,
            })
            .await?;

        tracing::info!(ticket_id = %ticket.id, ticket_key = %ticket.key, "Ticket created");
        self.signal(ResourceKind::Project, Some(project.id));
        self.signal(ResourceKind::Ticket, Some(ticket.id));
        Ok(ticket)
    }

    /// ## Summary
    /// Applies the part of `update` the actor's scope permits.
    ///
    /// Fields outside the scope are dropped, not rejected. An update left
    /// empty after narrowing writes nothing and signals nothing.
    ///
    /// ## Errors
    /// Returns `Forbidden` if the actor has no scope on the ticket at all.
    #[tracing::instrument(skip(self, actor, update))]
    pub async fn update_ticket(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
        update: TicketUpdate,
    ) -> ServiceResult<TicketUpdateOutcome> {
        let actor = actor.require()?;
        let ticket = self.load_ticket(ticket_id).await?;
        let role = self.role_in(actor, ticket.project_id).await?;

        let requested_assignee = update.assignee_id.unwrap_or(ticket.assignee_id);
        let allowed =
            policy::ticket_update_scope(role, actor.user_id, &ticket, requested_assignee)
                .require()?;

        let submitted = update.submitted_fields();
        let applied = submitted.intersection(allowed);
        let dropped = submitted.difference(allowed);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "Dropping ticket fields outside actor scope");
        }

        let changes = update.narrow(allowed)?;
        if changes.is_empty() {
            tracing::debug!("Ticket update is empty after narrowing");
            return Ok(TicketUpdateOutcome {
                ticket,
                applied,
                dropped,
            });
        }

        if let Some(assignee) = changes.assignee_id {
            self.ensure_assignable(ticket.project_id, assignee).await?;
        }

        let updated = self
            .store
            .update_ticket(ticket.id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Ticket", ticket_id))?;

        tracing::info!(ticket_id = %updated.id, ?applied, "Ticket updated");
        self.signal(ResourceKind::Ticket, Some(updated.id));
        self.signal(ResourceKind::Project, Some(updated.project_id));
        Ok(TicketUpdateOutcome {
            ticket: updated,
            applied,
            dropped,
        })
    }

    /// ## Summary
    /// Moves a ticket to another status.
    ///
    /// Gated on role alone: any Administrator or Developer of the project may
    /// change the status, whether or not they reported or are assigned to
    /// the ticket.
    ///
    /// ## Errors
    /// Returns `Forbidden` for Customers and non-members.
    #[tracing::instrument(skip(self, actor), fields(status = %request.status))]
    pub async fn change_ticket_status(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
        request: ChangeTicketStatus,
    ) -> ServiceResult<Ticket> {
        let actor = actor.require()?;
        let ticket = self.load_ticket(ticket_id).await?;
        let role = self.role_in(actor, ticket.project_id).await?;
        policy::can_change_ticket_status(role).require()?;

        let updated = self
            .store
            .update_ticket(ticket.id, TicketChangeset::status(request.status))
            .await?
            .ok_or_else(|| ServiceError::not_found("Ticket", ticket_id))?;

        tracing::info!(ticket_id = %updated.id, from = %ticket.status, to = %updated.status, "Ticket status changed");
        self.signal(ResourceKind::Ticket, Some(updated.id));
        self.signal(ResourceKind::Project, Some(updated.project_id));
        Ok(updated)
    }

    /// ## Summary
    /// Deletes a ticket and its comments.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor administers the project.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_ticket(&self, actor: &ActorContext, ticket_id: Uuid) -> ServiceResult<()> {
        let actor = actor.require()?;
        let ticket = self.load_ticket(ticket_id).await?;
        let role = self.role_in(actor, ticket.project_id).await?;
        policy::can_delete_ticket(role).require()?;

        if !self.store.delete_ticket(ticket.id).await? {
            return Err(ServiceError::not_found("Ticket", ticket_id));
        }

        tracing::info!(ticket_id = %ticket.id, ticket_key = %ticket.key, "Ticket deleted");
        self.signal(ResourceKind::Project, Some(ticket.project_id));
        self.signal(ResourceKind::Ticket, Some(ticket.id));
        Ok(())
    }
}
