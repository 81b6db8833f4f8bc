//! Triage issue tracker - integration test support.
//!
//! Provides an in-memory [`Store`](triage_db::store::Store), a recording
//! invalidation sink and seeding helpers, so that the mutation service and
//! the HTTP routes can be exercised without a database.

pub mod fixture;
pub mod memory;
pub mod recording;

pub use fixture::Fixture;
pub use memory::MemoryStore;
pub use recording::RecordingInvalidator;
