//! Resource stores for the Triage issue tracker.
//!
//! [`store::Store`] is the typed interface the service layer talks to. The
//! `PostgreSQL` implementation lives in [`db::pg_store`]; the row types shared
//! by every implementation live in [`model`].

pub mod db;
pub mod error;
pub mod model;
pub mod store;
