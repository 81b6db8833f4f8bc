use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::app_user;
use crate::model::user::{NewUser, User};

/// ## Summary
/// Retrieves a user by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<Option<User>> {
    app_user::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Retrieves a user by email.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_email(conn: &mut AsyncPgConnection, email: &str) -> QueryResult<Option<User>> {
    app_user::table
        .filter(app_user::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a new user and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create(conn: &mut AsyncPgConnection, new_user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(app_user::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}
