//! The typed resource store interface.
//!
//! One method per (table, operation) pair. Lookups return `Ok(None)` for a
//! missing row, updates return `Ok(None)` if the row vanished, and deletes
//! report whether a row was removed. Constraint violations and connectivity
//! failures come back as [`DbError`](crate::error::DbError).

use uuid::Uuid;

use crate::db::enums::Role;
use crate::error::DbResult;
use crate::model::{
    comment::{Comment, NewComment},
    membership::{Membership, NewMembership},
    project::{NewProject, Project, ProjectChangeset, ProjectWithRole},
    ticket::{NewTicket, Ticket, TicketChangeset},
    user::{NewUser, User},
};

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // Users

    async fn user_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    async fn user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Fails with `ConstraintViolation` if the email is taken.
    async fn insert_user(&self, new_user: NewUser) -> DbResult<User>;

    // Projects

    async fn project_by_id(&self, id: Uuid) -> DbResult<Option<Project>>;

    /// Projects the user is a member of, newest first.
    async fn projects_for_user(&self, user_id: Uuid) -> DbResult<Vec<ProjectWithRole>>;

    /// Fails with `ConstraintViolation` if the key is taken.
    async fn insert_project(&self, new_project: NewProject) -> DbResult<Project>;

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChangeset,
    ) -> DbResult<Option<Project>>;

    /// Removes the project together with its memberships, tickets and comments.
    async fn delete_project(&self, id: Uuid) -> DbResult<bool>;

    // Memberships

    async fn membership_for(&self, project_id: Uuid, user_id: Uuid)
    -> DbResult<Option<Membership>>;

    async fn membership_by_id(&self, id: Uuid) -> DbResult<Option<Membership>>;

    async fn memberships_for_project(&self, project_id: Uuid) -> DbResult<Vec<Membership>>;

    /// Fails with `ConstraintViolation` if the user is already a member.
    async fn insert_membership(&self, new_membership: NewMembership) -> DbResult<Membership>;

    async fn update_membership_role(&self, id: Uuid, role: Role) -> DbResult<Option<Membership>>;

    async fn delete_membership(&self, id: Uuid) -> DbResult<bool>;

    // Tickets

    async fn ticket_by_id(&self, id: Uuid) -> DbResult<Option<Ticket>>;

    /// Tickets of a project, newest first.
    async fn tickets_for_project(&self, project_id: Uuid) -> DbResult<Vec<Ticket>>;

    /// Inserts the ticket under the next key of its project.
    async fn insert_ticket(&self, new_ticket: NewTicket) -> DbResult<Ticket>;

    /// Applies `changes` and bumps `updated_at`.
    async fn update_ticket(&self, id: Uuid, changes: TicketChangeset) -> DbResult<Option<Ticket>>;

    /// Removes the ticket together with its comments.
    async fn delete_ticket(&self, id: Uuid) -> DbResult<bool>;

    // Comments

    async fn comment_by_id(&self, id: Uuid) -> DbResult<Option<Comment>>;

    /// Comments of a ticket, oldest first.
    async fn comments_for_ticket(&self, ticket_id: Uuid) -> DbResult<Vec<Comment>>;

    async fn insert_comment(&self, new_comment: NewComment) -> DbResult<Comment>;

    async fn update_comment_body(&self, id: Uuid, body: String) -> DbResult<Option<Comment>>;

    async fn delete_comment(&self, id: Uuid) -> DbResult<bool>;
}
