//! Shared building blocks for the Triage issue tracker.
//!
//! Nothing in this crate touches the database or the network; it holds the
//! configuration model, route constants, and the small validation helpers
//! used by every other layer.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
