//! In-memory [`Store`] with the constraints of the `PostgreSQL` schema.
//!
//! Unique keys, foreign keys and cascades behave like the migration
//! declares them, and the per-project ticket counter hands out keys the same
//! way. Faults can be injected to drive the failure paths of the services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use triage_db::{
    db::enums::Role,
    error::{DbError, DbResult},
    model::{
        comment::{Comment, NewComment},
        membership::{Membership, NewMembership},
        project::{NewProject, Project, ProjectChangeset, ProjectWithRole},
        ticket::{NewTicket, Ticket, TicketChangeset},
        user::{NewUser, User},
    },
    store::Store,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    ticket_sequences: HashMap<Uuid, i32>,
    memberships: HashMap<Uuid, Membership>,
    tickets: HashMap<Uuid, Ticket>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn require_user(&self, id: Uuid) -> DbResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(DbError::ConstraintViolation(format!(
                "user {id} does not exist"
            )))
        }
    }

    fn require_project(&self, id: Uuid) -> DbResult<()> {
        if self.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(DbError::ConstraintViolation(format!(
                "project {id} does not exist"
            )))
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    fail_membership_lookups: AtomicBool,
    fail_next_membership_insert: AtomicBool,
    membership_lookups: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes only `membership_for` fail, leaving other lookups intact.
    pub fn set_membership_lookups_failing(&self, failing: bool) {
        self.fail_membership_lookups.store(failing, Ordering::SeqCst);
    }

    /// Makes the next `insert_membership` fail after its checks pass.
    pub fn fail_next_membership_insert(&self) {
        self.fail_next_membership_insert.store(true, Ordering::SeqCst);
    }

    /// Number of `membership_for` calls served so far.
    #[must_use]
    pub fn membership_lookups(&self) -> usize {
        self.membership_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> DbResult<RwLockReadGuard<'_, Tables>> {
        self.check_available()?;
        Ok(match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        })
    }

    fn write(&self) -> DbResult<RwLockWriteGuard<'_, Tables>> {
        self.check_available()?;
        Ok(match self.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        })
    }

    /// Row count per table, for asserting that nothing was written.
    #[must_use]
    pub fn row_counts(&self) -> RowCounts {
        let tables = match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        RowCounts {
            users: tables.users.len(),
            projects: tables.projects.len(),
            memberships: tables.memberships.len(),
            tickets: tables.tickets.len(),
            comments: tables.comments.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub users: usize,
    pub projects: usize,
    pub memberships: usize,
    pub tickets: usize,
    pub comments: usize,
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(DbError::ConstraintViolation(format!(
                "email {} already registered",
                new_user.email
            )));
        }

        let user = User {
            id: Uuid::now_v7(),
            email: new_user.email,
            display_name: new_user.display_name,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn project_by_id(&self, id: Uuid) -> DbResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn projects_for_user(&self, user_id: Uuid) -> DbResult<Vec<ProjectWithRole>> {
        let tables = self.read()?;
        let mut projects: Vec<_> = tables
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                tables.projects.get(&m.project_id).map(|p| ProjectWithRole {
                    project: p.clone(),
                    role: m.role,
                })
            })
            .collect();
        projects.sort_by(|a, b| {
            (b.project.created_at, b.project.id).cmp(&(a.project.created_at, a.project.id))
        });
        Ok(projects)
    }

    async fn insert_project(&self, new_project: NewProject) -> DbResult<Project> {
        let mut tables = self.write()?;
        tables.require_user(new_project.created_by)?;
        if tables.projects.values().any(|p| p.key == new_project.key) {
            return Err(DbError::ConstraintViolation(format!(
                "project key {} already taken",
                new_project.key
            )));
        }

        let project = Project {
            id: Uuid::now_v7(),
            key: new_project.key,
            name: new_project.name,
            description: new_project.description,
            created_by: new_project.created_by,
            created_at: Utc::now(),
        };
        tables.ticket_sequences.insert(project.id, 0);
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChangeset,
    ) -> DbResult<Option<Project>> {
        let mut tables = self.write()?;
        Ok(tables.projects.get_mut(&id).map(|project| {
            project.name = changes.name;
            project.description = changes.description;
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> DbResult<bool> {
        let mut tables = self.write()?;
        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }

        tables.ticket_sequences.remove(&id);
        tables.memberships.retain(|_, m| m.project_id != id);
        let removed: Vec<Uuid> = tables
            .tickets
            .values()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();
        tables.tickets.retain(|_, t| t.project_id != id);
        tables.comments.retain(|_, c| !removed.contains(&c.ticket_id));
        Ok(true)
    }

    async fn membership_for(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> DbResult<Option<Membership>> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_membership_lookups.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("membership lookup timed out".to_string()));
        }

        Ok(self
            .read()?
            .memberships
            .values()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn membership_by_id(&self, id: Uuid) -> DbResult<Option<Membership>> {
        Ok(self.read()?.memberships.get(&id).cloned())
    }

    async fn memberships_for_project(&self, project_id: Uuid) -> DbResult<Vec<Membership>> {
        let tables = self.read()?;
        let mut members: Vec<_> = tables
            .memberships
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| (m.created_at, m.id));
        Ok(members)
    }

    async fn insert_membership(&self, new_membership: NewMembership) -> DbResult<Membership> {
        let mut tables = self.write()?;
        tables.require_project(new_membership.project_id)?;
        tables.require_user(new_membership.user_id)?;
        if tables.memberships.values().any(|m| {
            m.project_id == new_membership.project_id && m.user_id == new_membership.user_id
        }) {
            return Err(DbError::ConstraintViolation(
                "user is already a member of this project".to_string(),
            ));
        }

        if self.fail_next_membership_insert.swap(false, Ordering::SeqCst) {
            return Err(DbError::Unavailable("connection reset".to_string()));
        }

        let membership = Membership {
            id: Uuid::now_v7(),
            project_id: new_membership.project_id,
            user_id: new_membership.user_id,
            role: new_membership.role,
            created_at: Utc::now(),
        };
        tables.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn update_membership_role(&self, id: Uuid, role: Role) -> DbResult<Option<Membership>> {
        let mut tables = self.write()?;
        Ok(tables.memberships.get_mut(&id).map(|membership| {
            membership.role = role;
            membership.clone()
        }))
    }

    async fn delete_membership(&self, id: Uuid) -> DbResult<bool> {
        Ok(self.write()?.memberships.remove(&id).is_some())
    }

    async fn ticket_by_id(&self, id: Uuid) -> DbResult<Option<Ticket>> {
        Ok(self.read()?.tickets.get(&id).cloned())
    }

    async fn tickets_for_project(&self, project_id: Uuid) -> DbResult<Vec<Ticket>> {
        let tables = self.read()?;
        let mut tickets: Vec<_> = tables
            .tickets
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tickets)
    }

    async fn insert_ticket(&self, new_ticket: NewTicket) -> DbResult<Ticket> {
        let mut tables = self.write()?;
        tables.require_user(new_ticket.reporter_id)?;
        if let Some(assignee_id) = new_ticket.assignee_id {
            tables.require_user(assignee_id)?;
        }

        let project_key = tables
            .projects
            .get(&new_ticket.project_id)
            .map(|p| p.key.clone())
            .ok_or_else(|| {
                DbError::ConstraintViolation(format!(
                    "project {} does not exist",
                    new_ticket.project_id
                ))
            })?;
        let sequence = tables
            .ticket_sequences
            .entry(new_ticket.project_id)
            .or_insert(0);
        *sequence += 1;
        let key = format!("{project_key}-{sequence}");

        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::now_v7(),
            project_id: new_ticket.project_id,
            key,
            title: new_ticket.title,
            description: new_ticket.description,
            status: new_ticket.status,
            priority: new_ticket.priority,
            assignee_id: new_ticket.assignee_id,
            reporter_id: new_ticket.reporter_id,
            due_date: new_ticket.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(&self, id: Uuid, changes: TicketChangeset) -> DbResult<Option<Ticket>> {
        let mut tables = self.write()?;
        if let Some(Some(assignee_id)) = changes.assignee_id {
            tables.require_user(assignee_id)?;
        }
        Ok(tables.tickets.get_mut(&id).map(|ticket| {
            changes.apply_to(ticket);
            ticket.updated_at = Utc::now();
            ticket.clone()
        }))
    }

    async fn delete_ticket(&self, id: Uuid) -> DbResult<bool> {
        let mut tables = self.write()?;
        if tables.tickets.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.ticket_id != id);
        Ok(true)
    }

    async fn comment_by_id(&self, id: Uuid) -> DbResult<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn comments_for_ticket(&self, ticket_id: Uuid) -> DbResult<Vec<Comment>> {
        let tables = self.read()?;
        let mut comments: Vec<_> = tables
            .comments
            .values()
            .filter(|c| c.ticket_id == ticket_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn insert_comment(&self, new_comment: NewComment) -> DbResult<Comment> {
        let mut tables = self.write()?;
        tables.require_user(new_comment.author_id)?;
        if !tables.tickets.contains_key(&new_comment.ticket_id) {
            return Err(DbError::ConstraintViolation(format!(
                "ticket {} does not exist",
                new_comment.ticket_id
            )));
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            ticket_id: new_comment.ticket_id,
            author_id: new_comment.author_id,
            body: new_comment.body,
            visibility: new_comment.visibility,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment_body(&self, id: Uuid, body: String) -> DbResult<Option<Comment>> {
        let mut tables = self.write()?;
        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.body = body;
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> DbResult<bool> {
        Ok(self.write()?.comments.remove(&id).is_some())
    }
}
