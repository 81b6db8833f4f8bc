//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `actor`: The acting user, passed explicitly into every operation
//! - `authenticate`: Request authentication (single user, proxy header)
//! - `depot`: Actor storage in the Salvo depot
//! - `authorize`: Verdict type returned by policy functions
//! - `fields`: Ticket field sets used for field-narrowing
//! - `policy`: Pure authorization decisions per resource and operation
//! - `role`: Role resolution from the membership table

pub mod actor;
pub mod authenticate;
pub mod authorize;
pub mod depot;
pub mod fields;
pub mod policy;
pub mod role;

// Re-export commonly used types at module level
pub use actor::{Actor, ActorContext};
pub use authorize::AuthzResult;
pub use fields::{FieldSet, TicketField};
pub use role::resolve_role;
