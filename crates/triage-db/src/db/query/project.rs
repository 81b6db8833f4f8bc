use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::enums::Role;
use crate::db::schema::{project, project_membership};
use crate::model::project::{NewProject, Project, ProjectChangeset, ProjectWithRole};

/// ## Summary
/// Retrieves a project by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<Option<Project>> {
    project::table
        .find(id)
        .select(Project::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists the projects a user belongs to, with the user's role, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_user(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<ProjectWithRole>> {
    let rows: Vec<(Project, Role)> = project::table
        .inner_join(project_membership::table)
        .filter(project_membership::user_id.eq(user_id))
        .order(project::created_at.desc())
        .select((Project::as_select(), project_membership::role))
        .load(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(project, role)| ProjectWithRole { project, role })
        .collect())
}

/// ## Summary
/// Inserts a new project and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create(conn: &mut AsyncPgConnection, new_project: &NewProject) -> QueryResult<Project> {
    diesel::insert_into(project::table)
        .values(new_project)
        .returning(Project::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Updates the name and description of a project.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &ProjectChangeset,
) -> QueryResult<Option<Project>> {
    diesel::update(project::table.find(id))
        .set(changes)
        .returning(Project::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a project. Memberships, tickets and comments cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<bool> {
    diesel::delete(project::table.find(id))
        .execute(conn)
        .await
        .map(|count| count > 0)
}

/// ## Summary
/// Increments the ticket counter of a project and returns the project key with
/// the new counter value.
///
/// ## Errors
/// Returns `NotFound` if the project does not exist.
pub async fn next_ticket_sequence(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
) -> QueryResult<(String, i32)> {
    diesel::update(project::table.find(id))
        .set(project::ticket_sequence.eq(project::ticket_sequence + 1))
        .returning((project::key, project::ticket_sequence))
        .get_result(conn)
        .await
}
