use triage_core::types::ResourceKind;
use triage_db::{db::enums::Role, store::Store};
use triage_service::{
    auth::ActorContext,
    error::{ErrorCategory, ServiceError},
    mutation::{CreateComment, CreateProject, UpdateProject},
};
use triage_test::{Fixture, fixture::user_id, recording::view};

fn create(key: &str) -> CreateProject {
    CreateProject {
        name: "Core platform".to_string(),
        key: key.to_string(),
        description: Some("  Backend services  ".to_string()),
    }
}

// ============================================================================
// Creation
// ============================================================================

/// ## Summary
/// Test that the creator of a project becomes its administrator.
#[test_log::test(tokio::test)]
async fn create_project_grants_administrator() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");

    let project = fx
        .mutations
        .create_project(&ada, create("CORE"))
        .await
        .expect("project created");

    assert_eq!(project.key, "CORE");
    assert_eq!(project.description.as_deref(), Some("Backend services"));
    assert_eq!(project.created_by, user_id(&ada));

    let membership = fx
        .store
        .membership_for(project.id, user_id(&ada))
        .await
        .expect("lookup")
        .expect("creator is a member");
    assert_eq!(membership.role, Role::Administrator);

    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::ProjectList, None),
            view(ResourceKind::Project, Some(project.id)),
        ]
    );
}

/// ## Summary
/// Test that malformed keys are rejected as validation errors without
/// writing anything.
#[test_log::test(tokio::test)]
async fn create_project_rejects_malformed_keys() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let before = fx.store.row_counts();

    for key in ["core", "C", "ABCDEFGHIJK", "CO RE", "C0RE", ""] {
        let err = fx
            .mutations
            .create_project(&ada, create(key))
            .await
            .expect_err("key should be rejected");
        assert_eq!(err.category(), ErrorCategory::Validation, "key {key:?}");
    }

    assert_eq!(fx.store.row_counts(), before);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that surrounding whitespace is trimmed from the key.
#[test_log::test(tokio::test)]
async fn create_project_trims_key() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");

    let project = fx
        .mutations
        .create_project(&ada, create("  OPS "))
        .await
        .expect("project created");
    assert_eq!(project.key, "OPS");
}

/// ## Summary
/// Test that a taken key surfaces as a store error.
#[test_log::test(tokio::test)]
async fn create_project_with_duplicate_key_fails() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let bob = fx.actor("bob@example.com").await.expect("actor");
    fx.project(&ada, "CORE").await.expect("first project");

    let err = fx
        .mutations
        .create_project(&bob, create("CORE"))
        .await
        .expect_err("duplicate key");
    assert_eq!(err.category(), ErrorCategory::StoreError);
    assert!(fx.invalidator.recorded().is_empty());
}

/// ## Summary
/// Test that an anonymous caller cannot create a project.
#[test_log::test(tokio::test)]
async fn create_project_requires_authentication() {
    let fx = Fixture::new();

    let err = fx
        .mutations
        .create_project(&ActorContext::Anonymous, create("CORE"))
        .await
        .expect_err("anonymous");
    assert!(matches!(err, ServiceError::NotAuthenticated));
    assert_eq!(fx.store.row_counts().projects, 0);
}

/// ## Summary
/// Test that a failed administrator grant is reported as a partial creation
/// and the orphaned project is not surfaced as created.
#[test_log::test(tokio::test)]
async fn failed_admin_grant_reports_partial_creation() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    fx.store.fail_next_membership_insert();

    let err = fx
        .mutations
        .create_project(&ada, create("CORE"))
        .await
        .expect_err("membership insert fails");

    assert_eq!(err.category(), ErrorCategory::StoreError);
    let ServiceError::ProjectPartiallyCreated { project_id, .. } = err else {
        panic!("expected partial creation");
    };

    // The row is left in place but the creator cannot see it.
    assert!(
        fx.store
            .project_by_id(project_id)
            .await
            .expect("lookup")
            .is_some()
    );
    let listed = fx.queries.list_projects(&ada).await.expect("list");
    assert!(listed.is_empty());
    assert!(fx.invalidator.recorded().is_empty());
}

// ============================================================================
// Update and deletion
// ============================================================================

/// ## Summary
/// Test that only administrators update project fields.
#[test_log::test(tokio::test)]
async fn only_administrators_update_projects() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let dev = fx
        .member(&project, "dev@example.com", Role::Developer)
        .await
        .expect("developer");

    let update = UpdateProject {
        name: "Core".to_string(),
        description: None,
    };

    let err = fx
        .mutations
        .update_project(&dev, project.id, update.clone())
        .await
        .expect_err("developer cannot update");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let updated = fx
        .mutations
        .update_project(&ada, project.id, update)
        .await
        .expect("administrator updates");
    assert_eq!(updated.name, "Core");
    assert_eq!(updated.description, None);
    assert_eq!(updated.key, "CORE");
    assert_eq!(
        fx.invalidator.take(),
        vec![view(ResourceKind::Project, Some(project.id))]
    );
}

/// ## Summary
/// Test that a blank project name is rejected.
#[test_log::test(tokio::test)]
async fn update_project_rejects_blank_name() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let err = fx
        .mutations
        .update_project(
            &ada,
            project.id,
            UpdateProject {
                name: "   ".to_string(),
                description: None,
            },
        )
        .await
        .expect_err("blank name");
    assert_eq!(err.category(), ErrorCategory::Validation);
}

/// ## Summary
/// Test that non-members are forbidden and unknown projects are not found.
#[test_log::test(tokio::test)]
async fn delete_project_gates() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let mallory = fx.actor("mallory@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");

    let err = fx
        .mutations
        .delete_project(&mallory, project.id)
        .await
        .expect_err("non-member");
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let err = fx
        .mutations
        .delete_project(&ada, uuid::Uuid::now_v7())
        .await
        .expect_err("unknown project");
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

/// ## Summary
/// Test that deleting a project removes its memberships, tickets and comments.
#[test_log::test(tokio::test)]
async fn delete_project_cascades() {
    let fx = Fixture::new();
    let ada = fx.actor("ada@example.com").await.expect("actor");
    let project = fx.project(&ada, "CORE").await.expect("project");
    let ticket = fx.ticket(&ada, &project, "Crash").await.expect("ticket");
    fx.mutations
        .create_comment(
            &ada,
            ticket.id,
            CreateComment {
                body: "Looking".to_string(),
                visibility: None,
            },
        )
        .await
        .expect("comment");
    fx.invalidator.take();

    fx.mutations
        .delete_project(&ada, project.id)
        .await
        .expect("administrator deletes");

    let counts = fx.store.row_counts();
    assert_eq!(
        (counts.projects, counts.memberships, counts.tickets, counts.comments),
        (0, 0, 0, 0)
    );
    assert_eq!(
        fx.invalidator.take(),
        vec![
            view(ResourceKind::ProjectList, None),
            view(ResourceKind::Project, Some(project.id)),
        ]
    );
}
