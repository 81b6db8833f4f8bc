//! Integration tests for the Triage services and HTTP routes.
//!
//! Every test builds its own [`triage_test::Fixture`] over an in-memory
//! store, so tests run in parallel without shared state.

mod members;
mod projects;
mod roles;
mod tickets;
