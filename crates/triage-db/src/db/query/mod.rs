//! Query functions, one module per table.
//!
//! Every function takes a plain `AsyncPgConnection` so it can run either on a
//! pooled connection or inside a transaction.

pub mod comment;
pub mod membership;
pub mod project;
pub mod ticket;
pub mod user;
