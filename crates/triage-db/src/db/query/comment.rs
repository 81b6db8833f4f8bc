use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::ticket_comment;
use crate::model::comment::{Comment, NewComment};

/// ## Summary
/// Retrieves a comment by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<Option<Comment>> {
    ticket_comment::table
        .find(id)
        .select(Comment::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists the comments of a ticket, oldest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_ticket(
    conn: &mut AsyncPgConnection,
    ticket_id: uuid::Uuid,
) -> QueryResult<Vec<Comment>> {
    ticket_comment::table
        .filter(ticket_comment::ticket_id.eq(ticket_id))
        .order(ticket_comment::created_at.asc())
        .select(Comment::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a new comment and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create(conn: &mut AsyncPgConnection, new_comment: &NewComment) -> QueryResult<Comment> {
    diesel::insert_into(ticket_comment::table)
        .values(new_comment)
        .returning(Comment::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Replaces the body of a comment.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_body(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    body: &str,
) -> QueryResult<Option<Comment>> {
    diesel::update(ticket_comment::table.find(id))
        .set(ticket_comment::body.eq(body))
        .returning(Comment::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a comment.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<bool> {
    diesel::delete(ticket_comment::table.find(id))
        .execute(conn)
        .await
        .map(|count| count > 0)
}
