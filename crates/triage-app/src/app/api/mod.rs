mod app_specific;
mod comments;
mod extract;
mod members;
mod projects;
mod tickets;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use triage_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, COMMENTS_ROUTE_COMPONENT, MEMBERS_ROUTE_COMPONENT,
    PROJECTS_ROUTE_COMPONENT, PROJECTS_ROUTE_PREFIX, TICKETS_ROUTE_COMPONENT,
};

/// ## Summary
/// Constructs the main API router with all resource handlers.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .push(app_specific::routes())
        .push(projects::routes())
        .push(members::routes())
        .push(tickets::routes())
        .push(comments::routes())
}
