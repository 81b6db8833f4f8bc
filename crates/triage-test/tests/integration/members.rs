use triage_core::types::ResourceKind;
use triage_db::{db::enums::Role, store::Store};
use triage_service::{
    error::ErrorCategory,
    mutation::{AddMember, UpdateMemberRole},
};
use triage_test::{Fixture, fixture::user_id, recording::view};

// ============================================================================
// Adding members
// ============================================================================

/// ## Summary
/// Test that an administrator adds an existing user by email.
#[test_log::test(tokio::test)]
async fn add_member_by_email() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let bob = fx.actor("bob@example.com").await.expect("actor");

    let membership = fx
        .mutations
        .add_member(
            &ada,
            project.id,
            AddMember {
                email: " bob@example.com ".to_string(),
                role: Role::Customer,
            },
        )
        .await
        .expect("member added");

    assert_eq!(membership.user_id, user_id(&bob));
    assert_eq!(membership.role, Role::Customer);
    assert_eq!(
        fx.invalidator.take(),
        vec![view(ResourceKind::Project, Some(project.id))]
    );
}

/// ## Summary
/// Test that an unknown email is not found.
#[test_log::test(tokio::test)]
async fn add_member_with_unknown_email_is_not_found() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let err = fx
        .mutations
        .add_member(
            &ada,
            project.id,
            AddMember {
                email: "nobody@example.com".to_string(),
                role: Role::Developer,
            },
        )
        .await
        .expect_err("unknown user");
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that adding an existing member again violates the unique membership.
#[test_log::test(tokio::test)]
async fn add_member_twice_fails() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    fx.member(&project, "bob@example.com", Role::Developer)
        .await
        .expect("member");

    let err = fx
        .mutations
        .add_member(
            &ada,
            project.id,
            AddMember {
                email: "bob@example.com".to_string(),
                role: Role::Customer,
            },
        )
        .await
        .expect_err("duplicate membership");
    assert_eq!(err.category(), ErrorCategory::StoreError);
}

/// ## Summary
/// Test that membership changes require administrator role.
#[test_log::test(tokio::test)]
async fn non_administrators_cannot_manage_members() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");
    fx.actor("carol@example.com").await.expect("actor");

    let err = fx
        .mutations
        .add_member(
            &dev,
            project.id,
            AddMember {
                email: "carol@example.com".to_string(),
                role: Role::Administrator,
            },
        )
        .await
        .expect_err("developer cannot add members");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let ada_membership = fx
        .store
        .membership_for(project.id, user_id(&ada))
        .await
        .expect("lookup")
        .expect("member");
    let err = fx
        .mutations
        .remove_member(&dev, ada_membership.id)
        .await
        .expect_err("developer cannot remove members");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
}

// ============================================================================
// Role changes and removal
// ============================================================================

/// ## Summary
/// Test that a role change applies to the very next operation.
#[test_log::test(tokio::test)]
async fn role_change_takes_effect_immediately() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let bob = fx
        .member(&project, "bob@example.com", Role::Customer)
        .await
        .expect("customer");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");

    let membership = fx
        .store
        .membership_for(project.id, user_id(&bob))
        .await
        .expect("lookup")
        .expect("member");

    let err = fx
        .mutations
        .delete_ticket(&bob, ticket.id)
        .await
        .expect_err("customer cannot delete");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let updated = fx
        .mutations
        .update_member_role(
            &ada,
            membership.id,
            UpdateMemberRole {
                role: Role::Administrator,
            },
        )
        .await
        .expect("role updated");
    assert_eq!(updated.role, Role::Administrator);

    fx.mutations
        .delete_ticket(&bob, ticket.id)
        .await
        .expect("promoted member deletes");
}

/// ## Summary
/// Test that the last administrator may remove their own membership.
///
/// No guard exists against leaving a project without an administrator; this
/// pins the current behavior.
#[test_log::test(tokio::test)]
async fn last_administrator_can_remove_themself() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let membership = fx
        .store
        .membership_for(project.id, user_id(&ada))
        .await
        .expect("lookup")
        .expect("member");

    fx.mutations
        .remove_member(&ada, membership.id)
        .await
        .expect("removal is permitted");

    let members = fx
        .store
        .memberships_for_project(project.id)
        .await
        .expect("members");
    assert!(members.iter().all(|m| m.role != Role::Administrator));
    assert_eq!(
        fx.invalidator.take(),
        vec![view(ResourceKind::Project, Some(project.id))]
    );

    // With the membership gone, management is no longer possible.
    let err = fx
        .mutations
        .delete_project(&ada, project.id)
        .await
        .expect_err("former administrator");
    assert_eq!(err.category(), ErrorCategory::Forbidden);
}

/// ## Summary
/// Test that the last administrator may demote themself.
#[test_log::test(tokio::test)]
async fn last_administrator_can_demote_themself() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let membership = fx
        .store
        .membership_for(project.id, user_id(&ada))
        .await
        .expect("lookup")
        .expect("member");

    let demoted = fx
        .mutations
        .update_member_role(
            &ada,
            membership.id,
            UpdateMemberRole {
                role: Role::Developer,
            },
        )
        .await
        .expect("demotion is permitted");
    assert_eq!(demoted.role, Role::Developer);
}

/// ## Summary
/// Test that an unknown membership id is not found.
#[test_log::test(tokio::test)]
async fn unknown_membership_is_not_found() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");

    let err = fx
        .mutations
        .remove_member(&ada, uuid::Uuid::now_v7())
        .await
        .expect_err("unknown membership");
    assert_eq!(err.category(), ErrorCategory::NotFound);
}
