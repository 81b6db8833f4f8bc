//! Transaction helper utilities for database operations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diesel_async::scoped_futures::ScopedFutureExt;
//! use crate::db::transaction::with_transaction;
//!
//! with_transaction(&mut conn, |tx| async move {
//!     let sequence = query::project::next_ticket_sequence(tx, project_id).await?;
//!     query::ticket::insert(tx, &row).await.map_err(DbError::from)
//! }.scope_boxed()).await?;
//! ```

use diesel_async::{AsyncConnection, AsyncPgConnection, scoped_futures::ScopedBoxFuture};

use crate::error::{DbError, DbResult};

/// ## Summary
/// Runs a database transaction and returns the closure result.
///
/// ## Errors
/// Returns any error produced by the closure, or errors raised while starting
/// or committing the transaction.
pub async fn with_transaction<'a, 'conn, T, F>(
    conn: &'conn mut AsyncPgConnection,
    callback: F,
) -> DbResult<T>
where
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, DbResult<T>>
        + Send
        + 'a,
    T: Send + 'a,
    'a: 'conn,
{
    conn.transaction::<_, DbError, _>(callback).await
}
