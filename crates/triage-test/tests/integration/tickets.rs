use chrono::NaiveDate;

use triage_core::types::ResourceKind;
use triage_db::{
    db::enums::{Role, TicketPriority, TicketStatus},
    store::Store,
};
use triage_service::{
    auth::{FieldSet, TicketField},
    error::ErrorCategory,
    mutation::{ChangeTicketStatus, CreateTicket, TicketUpdate},
};
use triage_test::{Fixture, fixture::user_id, recording::view};

fn new_ticket(title: &str) -> CreateTicket {
    CreateTicket {
        title: title.to_string(),
        description: Some("Steps to reproduce".to_string()),
        priority: None,
        assignee_id: None,
        due_date: None,
    }
}

// ============================================================================
// Creation
// ============================================================================

/// ## Summary
/// Test that tickets get sequential keys, default priority and status Todo.
#[test_log::test(tokio::test)]
async fn create_ticket_assigns_sequential_keys() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let customer = fx
        .member(&project, "cust@example.com", Role::Customer)
        .await
        .expect("customer");

    let first = fx
        .mutations
        .create_ticket(&ada, project.id, new_ticket("Crash on save"))
        .await
        .expect("ticket");
    let second = fx
        .mutations
        .create_ticket(&customer, project.id, new_ticket("Typo"))
        .await
        .expect("any member may report");

    assert_eq!(first.key, "CORE-1");
    assert_eq!(second.key, "CORE-2");
    assert_eq!(first.status, TicketStatus::Todo);
    assert_eq!(first.priority, TicketPriority::Medium);
    assert_eq!(second.reporter_id, user_id(&customer));
    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::Project, Some(project.id)),
            view(ResourceKind::Ticket, Some(first.id)),
            view(ResourceKind::Project, Some(project.id)),
            view(ResourceKind::Ticket, Some(second.id)),
        ]
    );
}

/// ## Summary
/// Test that non-members cannot report tickets.
#[test_log::test(tokio::test)]
async fn non_members_cannot_create_tickets() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let mallory = fx.actor("mallory@example.com").await.expect("actor");

    let err = fx
        .mutations
        .create_ticket(&mallory, project.id, new_ticket("Spam"))
        .await
        .expect_err("non-member");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
    assert_eq!(fx.store.row_counts().tickets, 0);
}

/// ## Summary
/// Test that the assignee must be a project member.
#[test_log::test(tokio::test)]
async fn create_ticket_rejects_non_member_assignee() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let outsider = fx.actor("outsider@example.com").await.expect("actor");

    let err = fx
        .mutations
        .create_ticket(
            &ada,
            project.id,
            CreateTicket {
                assignee_id: Some(user_id(&outsider)),
                ..new_ticket("Crash")
            },
        )
        .await
        .expect_err("outsider assignee");
    assert_eq!(err.category(), ErrorCategory::Validation);

    let err = fx
        .mutations
        .create_ticket(&ada, project.id, new_ticket("   "))
        .await
        .expect_err("blank title");
    assert_eq!(err.category(), ErrorCategory::Validation);
}

// ============================================================================
// Field-narrowed updates
// ============================================================================

/// ## Summary
/// Test that an administrator who reported a ticket can move it to Done.
#[test_log::test(tokio::test)]
async fn administrator_updates_status_of_own_ticket() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");
    assert_eq!(ticket.assignee_id, None);

    let outcome = fx
        .mutations
        .update_ticket(
            &ada,
            ticket.id,
            TicketUpdate {
                status: Some(TicketStatus::Done),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(outcome.ticket.status, TicketStatus::Done);
    assert_eq!(outcome.applied, FieldSet::of(&[TicketField::Status]));
    assert!(outcome.dropped.is_empty());
    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::Ticket, Some(ticket.id)),
            view(ResourceKind::Project, Some(project.id)),
        ]
    );
}

/// ## Summary
/// Test that an administrator's update persists every submitted field.
#[test_log::test(tokio::test)]
async fn administrator_updates_every_field() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let reporter = fx
        .member(&project, "rep@example.com", Role::Customer)
        .await
        .expect("customer");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    let ticket = fx.ticket(&reporter, &project, "Crash").await.expect("ticket");
    let due = NaiveDate::from_ymd_opt(2026, 11, 30).expect("valid date");

    let outcome = fx
        .mutations
        .update_ticket(
            &ada,
            ticket.id,
            TicketUpdate {
                title: Some("Crash on save".to_string()),
                description: Some(None),
                status: Some(TicketStatus::InProgress),
                priority: Some(TicketPriority::Critical),
                assignee_id: Some(Some(user_id(&dev))),
                due_date: Some(Some(due)),
            },
        )
        .await
        .expect("update");

    let t = outcome.ticket;
    assert_eq!(t.title, "Crash on save");
    assert_eq!(t.description, None);
    assert_eq!(t.status, TicketStatus::InProgress);
    assert_eq!(t.priority, TicketPriority::Critical);
    assert_eq!(t.assignee_id, Some(user_id(&dev)));
    assert_eq!(t.due_date, Some(due));
    assert_eq!(outcome.applied, FieldSet::FULL);
    assert_eq!(t.key, ticket.key);
    assert_eq!(t.reporter_id, ticket.reporter_id);
}

/// ## Summary
/// Test that a reporting customer only changes title and description; the
/// other submitted fields are dropped.
#[test_log::test(tokio::test)]
async fn customer_update_is_narrowed_to_content() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let customer = fx
        .member(&project, "cust@example.com", Role::Customer)
        .await
        .expect("customer");
    let ticket = fx.ticket(&customer, &project, "Crash").await.expect("ticket");

    let outcome = fx
        .mutations
        .update_ticket(
            &customer,
            ticket.id,
            TicketUpdate {
                title: Some("x".to_string()),
                status: Some(TicketStatus::Done),
                priority: Some(TicketPriority::Critical),
                assignee_id: Some(Some(user_id(&customer))),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("narrowed update succeeds");

    assert_eq!(outcome.applied, FieldSet::of(&[TicketField::Title]));
    assert_eq!(
        outcome.dropped,
        FieldSet::of(&[
            TicketField::Status,
            TicketField::Priority,
            TicketField::Assignee
        ])
    );

    let stored = fx
        .store
        .ticket_by_id(ticket.id)
        .await
        .expect("lookup")
        .expect("ticket");
    assert_eq!(stored.title, "x");
    assert_eq!(stored.status, TicketStatus::Todo);
    assert_eq!(stored.priority, TicketPriority::Medium);
    assert_eq!(stored.assignee_id, None);
}

/// ## Summary
/// Test that a customer cannot update a ticket someone else reported.
#[test_log::test(tokio::test)]
async fn customer_cannot_update_foreign_ticket() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let customer = fx
        .member(&project, "cust@example.com", Role::Customer)
        .await
        .expect("customer");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    let err = fx
        .mutations
        .update_ticket(
            &customer,
            ticket.id,
            TicketUpdate {
                title: Some("Mine now".to_string()),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect_err("not the reporter");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that an unrelated developer is forbidden, but succeeds with the
/// full field set when assigning the ticket to themself.
#[test_log::test(tokio::test)]
async fn developer_scope_depends_on_relation() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    let err = fx
        .mutations
        .update_ticket(
            &dev,
            ticket.id,
            TicketUpdate {
                priority: Some(TicketPriority::High),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect_err("neither reporter nor assignee");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let outcome = fx
        .mutations
        .update_ticket(
            &dev,
            ticket.id,
            TicketUpdate {
                priority: Some(TicketPriority::High),
                assignee_id: Some(Some(user_id(&dev))),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("self-assignment grants scope");
    assert_eq!(outcome.ticket.assignee_id, Some(user_id(&dev)));
    assert_eq!(outcome.ticket.priority, TicketPriority::High);
    assert!(outcome.dropped.is_empty());

    // Now assigned, the developer keeps full scope without resubmitting.
    fx.mutations
        .update_ticket(
            &dev,
            ticket.id,
            TicketUpdate {
                due_date: Some(NaiveDate::from_ymd_opt(2026, 12, 1)),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("current assignee");
}

/// ## Summary
/// Test that a developer who unassigns themself loses scope for that update.
#[test_log::test(tokio::test)]
async fn developer_cannot_unassign_themself_from_foreign_ticket() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");
    fx.mutations
        .update_ticket(
            &ada,
            ticket.id,
            TicketUpdate {
                assignee_id: Some(Some(user_id(&dev))),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("administrator assigns");

    let err = fx
        .mutations
        .update_ticket(
            &dev,
            ticket.id,
            TicketUpdate {
                assignee_id: Some(None),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect_err("requested assignee is nobody");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
}

/// ## Summary
/// Test that an update emptied by narrowing writes nothing and emits no
/// signal.
#[test_log::test(tokio::test)]
async fn fully_dropped_update_is_a_no_op() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let customer = fx
        .member(&project, "cust@example.com", Role::Customer)
        .await
        .expect("customer");
    let ticket = fx.ticket(&customer, &project, "Crash").await.expect("ticket");

    let outcome = fx
        .mutations
        .update_ticket(
            &customer,
            ticket.id,
            TicketUpdate {
                status: Some(TicketStatus::Done),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("no-op succeeds");

    assert!(outcome.applied.is_empty());
    assert_eq!(outcome.dropped, FieldSet::of(&[TicketField::Status]));
    assert_eq!(outcome.ticket, ticket);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that an assignee set by update must be a project member.
#[test_log::test(tokio::test)]
async fn update_rejects_non_member_assignee() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let outsider = fx.actor("outsider@example.com").await.expect("actor");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    let err = fx
        .mutations
        .update_ticket(
            &ada,
            ticket.id,
            TicketUpdate {
                assignee_id: Some(Some(user_id(&outsider))),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect_err("outsider assignee");
    assert_eq!(err.category(), ErrorCategory::Validation);
}

// ============================================================================
// Status changes and deletion
// ============================================================================

/// ## Summary
/// Test that any developer can change status, even of an unrelated ticket.
#[test_log::test(tokio::test)]
async fn unrelated_developer_changes_status() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    let updated = fx
        .mutations
        .change_ticket_status(
            &dev,
            ticket.id,
            ChangeTicketStatus {
                status: TicketStatus::InProgress,
            },
        )
        .await
        .expect("status gate is role-only");

    assert_eq!(updated.status, TicketStatus::InProgress);
    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::Ticket, Some(ticket.id)),
            view(ResourceKind::Project, Some(project.id)),
        ]
    );
}

/// ## Summary
/// Test that customers cannot change status, even on their own ticket.
#[test_log::test(tokio::test)]
async fn customer_cannot_change_status() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let customer = fx
        .member(&project, "cust@example.com", Role::Customer)
        .await
        .expect("customer");
    let ticket = fx.ticket(&customer, &project, "Crash").await.expect("ticket");

    let err = fx
        .mutations
        .change_ticket_status(
            &customer,
            ticket.id,
            ChangeTicketStatus {
                status: TicketStatus::Done,
            },
        )
        .await
        .expect_err("customer");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
}

/// ## Summary
/// Test that only administrators delete tickets, and comments go with them.
#[test_log::test(tokio::test)]
async fn delete_ticket_requires_administrator() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    let ticket = fx.ticket(&dev, &project, "Crash").await.expect("ticket");

    let err = fx
        .mutations
        .delete_ticket(&dev, ticket.id)
        .await
        .expect_err("reporter is not enough");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    fx.mutations
        .delete_ticket(&ada, ticket.id)
        .await
        .expect("administrator deletes");
    assert!(
        fx.store
            .ticket_by_id(ticket.id)
            .await
            .expect("lookup")
            .is_none()
    );
    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::Project, Some(project.id)),
            view(ResourceKind::Ticket, Some(ticket.id)),
        ]
    );

    let err = fx
        .mutations
        .delete_ticket(&ada, ticket.id)
        .await
        .expect_err("already gone");
    assert_eq!(err.category(), ErrorCategory::NotFound);
}
