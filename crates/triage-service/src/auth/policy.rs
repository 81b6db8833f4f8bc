//! Authorization policy.
//!
//! Pure decision functions, one per resource operation. They take the
//! resolved role (`None` for non-members) plus whatever resource state the
//! decision needs, and never perform I/O.

use uuid::Uuid;

use super::{Actor, AuthzResult, FieldSet};
use triage_db::{
    db::enums::{CommentVisibility, Role},
    model::{comment::Comment, ticket::Ticket},
};

const NOT_A_MEMBER: &str = "You are not a member of this project";
const ADMINISTRATORS_ONLY: &str = "Only project administrators can do this";

/// Any authenticated actor may create a project; creation grants membership.
#[must_use]
pub const fn can_create_project(_actor: &Actor) -> AuthzResult {
    AuthzResult::Allowed(())
}

/// Covers project updates and deletion as well as all membership changes.
#[must_use]
pub const fn can_manage_project(role: Option<Role>) -> AuthzResult {
    match role {
        Some(Role::Administrator) => AuthzResult::Allowed(()),
        Some(Role::Developer | Role::Customer) => AuthzResult::Denied(ADMINISTRATORS_ONLY),
        None => AuthzResult::Denied(NOT_A_MEMBER),
    }
}

#[must_use]
pub const fn can_create_ticket(role: Option<Role>) -> AuthzResult {
    match role {
        Some(_) => AuthzResult::Allowed(()),
        None => AuthzResult::Denied(NOT_A_MEMBER),
    }
}

#[must_use]
pub const fn can_delete_ticket(role: Option<Role>) -> AuthzResult {
    match role {
        Some(Role::Administrator) => AuthzResult::Allowed(()),
        Some(Role::Developer | Role::Customer) => {
            AuthzResult::Denied("Only project administrators can delete tickets")
        }
        None => AuthzResult::Denied(NOT_A_MEMBER),
    }
}

/// Status changes are gated on role alone, independent of the ticket's
/// reporter or assignee.
#[must_use]
pub const fn can_change_ticket_status(role: Option<Role>) -> AuthzResult {
    match role {
        Some(Role::Administrator | Role::Developer) => AuthzResult::Allowed(()),
        Some(Role::Customer) => AuthzResult::Denied("Customers cannot change ticket status"),
        None => AuthzResult::Denied(NOT_A_MEMBER),
    }
}

/// ## Summary
/// Computes which ticket fields `actor_id` may change.
///
/// `requested_assignee` is the assignee the ticket would have after the
/// update. A Developer may update when they reported the ticket or end up
/// assigned to it. A Customer may only touch the content of a ticket they
/// reported.
#[must_use]
pub fn ticket_update_scope(
    role: Option<Role>,
    actor_id: Uuid,
    ticket: &Ticket,
    requested_assignee: Option<Uuid>,
) -> AuthzResult<FieldSet> {
    let is_reporter = ticket.reporter_id == actor_id;

    match role {
        Some(Role::Administrator) => AuthzResult::Allowed(FieldSet::FULL),
        Some(Role::Developer) if is_reporter || requested_assignee == Some(actor_id) => {
            AuthzResult::Allowed(FieldSet::FULL)
        }
        Some(Role::Developer) => AuthzResult::Denied(
            "Developers can only update tickets they reported or are assigned to",
        ),
        Some(Role::Customer) if is_reporter => AuthzResult::Allowed(FieldSet::CONTENT),
        Some(Role::Customer) => {
            AuthzResult::Denied("Customers can only update tickets they reported")
        }
        None => AuthzResult::Denied(NOT_A_MEMBER),
    }
}

/// Grants the effective visibility of a new comment. Unspecified visibility
/// is Public.
#[must_use]
pub fn can_create_comment(
    role: Option<Role>,
    requested: Option<CommentVisibility>,
) -> AuthzResult<CommentVisibility> {
    let visibility = requested.unwrap_or_default();

    match (role, visibility) {
        (None, _) => AuthzResult::Denied(NOT_A_MEMBER),
        (Some(Role::Customer), CommentVisibility::Internal) => {
            AuthzResult::Denied("Customers cannot create internal comments")
        }
        (Some(_), visibility) => AuthzResult::Allowed(visibility),
    }
}

/// Authorship alone grants edit; administrators cannot edit others' comments.
#[must_use]
pub fn can_edit_comment(actor_id: Uuid, comment: &Comment) -> AuthzResult {
    AuthzResult::allow_if(
        comment.author_id == actor_id,
        "You can only edit your own comments",
    )
}

#[must_use]
pub fn can_delete_comment(actor_id: Uuid, role: Option<Role>, comment: &Comment) -> AuthzResult {
    AuthzResult::allow_if(
        comment.author_id == actor_id || role.is_some_and(Role::is_administrator),
        "You can only delete your own comments",
    )
}

/// Internal comments are hidden from Customers and non-members.
#[must_use]
pub fn can_view_comment(role: Option<Role>, comment: &Comment) -> bool {
    match role {
        Some(Role::Administrator | Role::Developer) => true,
        Some(Role::Customer) => comment.visibility == CommentVisibility::Public,
        None => false,
    }
}
