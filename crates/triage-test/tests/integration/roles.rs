use triage_db::db::enums::Role;
use triage_service::{
    auth::{ActorContext, resolve_role},
    error::{ErrorCategory, ServiceError},
    mutation::TicketUpdate,
};
use triage_test::{Fixture, fixture::user_id};

/// ## Summary
/// Test that role resolution is repeatable and writes nothing.
#[test_log::test(tokio::test)]
async fn role_resolution_is_idempotent() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let before = fx.store.row_counts();

    let first = resolve_role(fx.store.as_ref(), user_id(&ada), project.id)
        .await
        .expect("resolve");
    let second = resolve_role(fx.store.as_ref(), user_id(&ada), project.id)
        .await
        .expect("resolve");

    assert_eq!(first, Some(Role::Administrator));
    assert_eq!(first, second);
    assert_eq!(fx.store.row_counts(), before);
}

/// ## Summary
/// Test that a missing membership resolves to no role rather than an error.
#[test_log::test(tokio::test)]
async fn non_member_resolves_to_none() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let bob = fx.actor("bob@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let role = resolve_role(fx.store.as_ref(), user_id(&bob), project.id)
        .await
        .expect("resolve");
    assert_eq!(role, None);
}

/// ## Summary
/// Test that every operation reads the membership afresh.
#[test_log::test(tokio::test)]
async fn each_operation_reads_membership() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");
    let before = fx.store.membership_lookups();

    for _ in 0..3 {
        fx.mutations
            .update_ticket(
                &ada,
                ticket.id,
                TicketUpdate {
                    title: Some("Crash on save".to_string()),
                    ..TicketUpdate::default()
                },
            )
            .await
            .expect("update");
    }

    assert_eq!(fx.store.membership_lookups() - before, 3);
}

/// ## Summary
/// Test that a failed membership lookup aborts the operation as
/// store-unavailable and applies nothing.
#[test_log::test(tokio::test)]
async fn failed_role_lookup_is_store_unavailable() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    fx.store.set_membership_lookups_failing(true);
    let err = fx
        .mutations
        .delete_ticket(&ada, ticket.id)
        .await
        .expect_err("lookup fails");
    fx.store.set_membership_lookups_failing(false);

    assert!(matches!(err, ServiceError::StoreUnavailable(_)));
    assert_eq!(err.category(), ErrorCategory::StoreUnavailable);
    assert_eq!(fx.store.row_counts().tickets, 1);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that an unreachable store is reported as unavailable.
#[test_log::test(tokio::test)]
async fn unreachable_store_is_unavailable() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    fx.store.set_unavailable(true);
    let err = fx
        .mutations
        .delete_project(&ada, project.id)
        .await
        .expect_err("store down");
    fx.store.set_unavailable(false);

    assert_eq!(err.category(), ErrorCategory::StoreUnavailable);
    assert_eq!(fx.store.row_counts().projects, 1);
}

/// ## Summary
/// Test that anonymous callers are rejected before any lookup.
#[test_log::test(tokio::test)]
async fn anonymous_caller_is_unauthenticated() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let before = fx.store.membership_lookups();

    let err = fx
        .mutations
        .delete_project(&ActorContext::Anonymous, project.id)
        .await
        .expect_err("anonymous");
    assert_eq!(err.category(), ErrorCategory::Unauthenticated);
    assert_eq!(fx.store.membership_lookups(), before);
}
