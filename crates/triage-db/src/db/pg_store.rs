//! `PostgreSQL` implementation of [`Store`].

use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::db::connection::{DbConnection, DbPool};
use crate::db::enums::Role;
use crate::db::query;
use crate::db::transaction::with_transaction;
use crate::error::{DbError, DbResult};
use crate::model::{
    comment::{Comment, NewComment},
    membership::{Membership, NewMembership},
    project::{NewProject, Project, ProjectChangeset, ProjectWithRole},
    ticket::{NewTicket, Ticket, TicketChangeset},
    user::{NewUser, User},
};
use crate::store::Store;

/// Store backed by a bb8 pool of diesel-async connections.
///
/// Row-level security in the database stays in place as a backstop; this
/// type does not make authorization decisions.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> DbResult<DbConnection<'_>> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self))]
    async fn user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::by_id(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::by_email(&mut conn, email).await?)
    }

    #[tracing::instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn insert_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut conn = self.conn().await?;
        Ok(query::user::create(&mut conn, &new_user).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn project_by_id(&self, id: Uuid) -> DbResult<Option<Project>> {
        let mut conn = self.conn().await?;
        Ok(query::project::by_id(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn projects_for_user(&self, user_id: Uuid) -> DbResult<Vec<ProjectWithRole>> {
        let mut conn = self.conn().await?;
        Ok(query::project::for_user(&mut conn, user_id).await?)
    }

    #[tracing::instrument(skip(self, new_project), fields(key = %new_project.key))]
    async fn insert_project(&self, new_project: NewProject) -> DbResult<Project> {
        let mut conn = self.conn().await?;
        Ok(query::project::create(&mut conn, &new_project).await?)
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChangeset,
    ) -> DbResult<Option<Project>> {
        let mut conn = self.conn().await?;
        Ok(query::project::update(&mut conn, id, &changes).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_project(&self, id: Uuid) -> DbResult<bool> {
        let mut conn = self.conn().await?;
        Ok(query::project::delete(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn membership_for(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> DbResult<Option<Membership>> {
        let mut conn = self.conn().await?;
        Ok(query::membership::for_project_and_user(&mut conn, project_id, user_id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn membership_by_id(&self, id: Uuid) -> DbResult<Option<Membership>> {
        let mut conn = self.conn().await?;
        Ok(query::membership::by_id(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn memberships_for_project(&self, project_id: Uuid) -> DbResult<Vec<Membership>> {
        let mut conn = self.conn().await?;
        Ok(query::membership::for_project(&mut conn, project_id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_membership(&self, new_membership: NewMembership) -> DbResult<Membership> {
        let mut conn = self.conn().await?;
        Ok(query::membership::create(&mut conn, &new_membership).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn update_membership_role(&self, id: Uuid, role: Role) -> DbResult<Option<Membership>> {
        let mut conn = self.conn().await?;
        Ok(query::membership::update_role(&mut conn, id, role).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_membership(&self, id: Uuid) -> DbResult<bool> {
        let mut conn = self.conn().await?;
        Ok(query::membership::delete(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn ticket_by_id(&self, id: Uuid) -> DbResult<Option<Ticket>> {
        let mut conn = self.conn().await?;
        Ok(query::ticket::by_id(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn tickets_for_project(&self, project_id: Uuid) -> DbResult<Vec<Ticket>> {
        let mut conn = self.conn().await?;
        Ok(query::ticket::for_project(&mut conn, project_id).await?)
    }

    #[tracing::instrument(skip(self, new_ticket), fields(project_id = %new_ticket.project_id))]
    async fn insert_ticket(&self, new_ticket: NewTicket) -> DbResult<Ticket> {
        let mut conn = self.conn().await?;

        let ticket = with_transaction(&mut conn, move |tx| {
            async move {
                let (project_key, sequence) =
                    query::project::next_ticket_sequence(tx, new_ticket.project_id).await?;
                let row = new_ticket.with_key(format!("{project_key}-{sequence}"));
                query::ticket::create(tx, &row).await.map_err(DbError::from)
            }
            .scope_boxed()
        })
        .await?;

        tracing::debug!(ticket_id = %ticket.id, ticket_key = %ticket.key, "Ticket inserted");
        Ok(ticket)
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update_ticket(&self, id: Uuid, changes: TicketChangeset) -> DbResult<Option<Ticket>> {
        let mut conn = self.conn().await?;
        Ok(query::ticket::update(&mut conn, id, &changes).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_ticket(&self, id: Uuid) -> DbResult<bool> {
        let mut conn = self.conn().await?;
        Ok(query::ticket::delete(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn comment_by_id(&self, id: Uuid) -> DbResult<Option<Comment>> {
        let mut conn = self.conn().await?;
        Ok(query::comment::by_id(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn comments_for_ticket(&self, ticket_id: Uuid) -> DbResult<Vec<Comment>> {
        let mut conn = self.conn().await?;
        Ok(query::comment::for_ticket(&mut conn, ticket_id).await?)
    }

    #[tracing::instrument(skip(self, new_comment), fields(ticket_id = %new_comment.ticket_id))]
    async fn insert_comment(&self, new_comment: NewComment) -> DbResult<Comment> {
        let mut conn = self.conn().await?;
        Ok(query::comment::create(&mut conn, &new_comment).await?)
    }

    #[tracing::instrument(skip(self, body))]
    async fn update_comment_body(&self, id: Uuid, body: String) -> DbResult<Option<Comment>> {
        let mut conn = self.conn().await?;
        Ok(query::comment::update_body(&mut conn, id, &body).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_comment(&self, id: Uuid) -> DbResult<bool> {
        let mut conn = self.conn().await?;
        Ok(query::comment::delete(&mut conn, id).await?)
    }
}
