//! The authorization and mutation-policy core of Triage.
//!
//! - [`auth`]: who the actor is, what role they hold, and the pure policy
//!   functions that decide what they may change.
//! - [`mutation`]: one operation per write use case, each resolving the
//!   actor, consulting the policy, applying the permitted change and
//!   signalling stale views.
//! - [`query`]: membership-gated reads for the presentation layer.
//! - [`invalidate`]: sinks for stale-view signals.

pub mod auth;
pub mod error;
pub mod invalidate;
pub mod mutation;
pub mod query;
