use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::{
    enums::{TicketPriority, TicketStatus},
    schema,
};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::ticket)]
#[diesel(check_for_backend(Pg))]
pub struct Ticket {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    /// `{PROJECT_KEY}-{n}`, assigned by the store at insertion.
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_id: Option<uuid::Uuid>,
    pub reporter_id: uuid::Uuid,
    pub due_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A ticket as requested by its reporter, before the store assigns its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub project_id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_id: Option<uuid::Uuid>,
    pub reporter_id: uuid::Uuid,
    pub due_date: Option<chrono::NaiveDate>,
}

impl NewTicket {
    /// Returns the insertable row for this ticket under `key`.
    #[must_use]
    pub fn with_key(&self, key: String) -> TicketInsert<'_> {
        TicketInsert {
            project_id: self.project_id,
            key,
            title: &self.title,
            description: self.description.as_deref(),
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            reporter_id: self.reporter_id,
            due_date: self.due_date,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::ticket)]
pub struct TicketInsert<'a> {
    pub project_id: uuid::Uuid,
    pub key: String,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_id: Option<uuid::Uuid>,
    pub reporter_id: uuid::Uuid,
    pub due_date: Option<chrono::NaiveDate>,
}

/// Field-level ticket update. `None` leaves a column untouched; for nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = schema::ticket)]
pub struct TicketChangeset {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assignee_id: Option<Option<uuid::Uuid>>,
    pub due_date: Option<Option<chrono::NaiveDate>>,
}

impl TicketChangeset {
    /// A changeset that only moves the ticket to `status`.
    #[must_use]
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.due_date.is_none()
    }

    /// Writes the changed fields onto `ticket`.
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(title) = &self.title {
            ticket.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            ticket.description.clone_from(description);
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(assignee_id) = self.assignee_id {
            ticket.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            ticket.due_date = due_date;
        }
    }
}
