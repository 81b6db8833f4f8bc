use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::enums::Role;
use crate::db::schema::project_membership;
use crate::model::membership::{Membership, NewMembership};

/// ## Summary
/// Retrieves the membership of a user in a project.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_project_and_user(
    conn: &mut AsyncPgConnection,
    project_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Membership>> {
    project_membership::table
        .filter(project_membership::project_id.eq(project_id))
        .filter(project_membership::user_id.eq(user_id))
        .select(Membership::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Retrieves a membership by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
) -> QueryResult<Option<Membership>> {
    project_membership::table
        .find(id)
        .select(Membership::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists the memberships of a project in the order they were granted.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_project(
    conn: &mut AsyncPgConnection,
    project_id: uuid::Uuid,
) -> QueryResult<Vec<Membership>> {
    project_membership::table
        .filter(project_membership::project_id.eq(project_id))
        .order(project_membership::created_at.asc())
        .select(Membership::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a new membership and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails, including a unique violation
/// when the user already belongs to the project.
pub async fn create(
    conn: &mut AsyncPgConnection,
    new_membership: &NewMembership,
) -> QueryResult<Membership> {
    diesel::insert_into(project_membership::table)
        .values(new_membership)
        .returning(Membership::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Changes the role of a membership.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_role(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    role: Role,
) -> QueryResult<Option<Membership>> {
    diesel::update(project_membership::table.find(id))
        .set(project_membership::role.eq(role))
        .returning(Membership::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a membership.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<bool> {
    diesel::delete(project_membership::table.find(id))
        .execute(conn)
        .await
        .map(|count| count > 0)
}
