use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::ticket;
use crate::model::ticket::{Ticket, TicketChangeset, TicketInsert};

/// ## Summary
/// Retrieves a ticket by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<Option<Ticket>> {
    ticket::table
        .find(id)
        .select(Ticket::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists the tickets of a project, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_project(
    conn: &mut AsyncPgConnection,
    project_id: uuid::Uuid,
) -> QueryResult<Vec<Ticket>> {
    ticket::table
        .filter(ticket::project_id.eq(project_id))
        .order(ticket::created_at.desc())
        .select(Ticket::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a ticket row and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create(conn: &mut AsyncPgConnection, row: &TicketInsert<'_>) -> QueryResult<Ticket> {
    diesel::insert_into(ticket::table)
        .values(row)
        .returning(Ticket::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Applies a changeset to a ticket and bumps `updated_at`.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &TicketChangeset,
) -> QueryResult<Option<Ticket>> {
    diesel::update(ticket::table.find(id))
        .set((changes, ticket::updated_at.eq(chrono::Utc::now())))
        .returning(Ticket::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a ticket. Comments cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<bool> {
    diesel::delete(ticket::table.find(id))
        .execute(conn)
        .await
        .map(|count| count > 0)
}
