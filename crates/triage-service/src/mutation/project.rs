use serde::Deserialize;
use uuid::Uuid;

use super::MutationService;
use crate::auth::{ActorContext, policy};
use crate::error::{ServiceError, ServiceResult};
use triage_core::{types::ResourceKind, util::validate};
use triage_db::{
    db::enums::Role,
    model::{
        membership::NewMembership,
        project::{NewProject, Project, ProjectChangeset},
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Replaces both mutable project fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl MutationService {
    /// ## Summary
    /// Creates a project and grants the creator Administrator membership.
    ///
    /// ## Side Effects
    /// - Inserts a project row and a membership row
    /// - Signals the project list and the new project as stale
    ///
    /// ## Errors
    /// Returns `Validation` for a malformed key or empty name. If the
    /// membership insert fails after the project row was written, returns
    /// `ProjectPartiallyCreated`; the project row is left in place.
    #[tracing::instrument(skip(self, actor, request), fields(key = %request.key))]
    pub async fn create_project(
        &self,
        actor: &ActorContext,
        request: CreateProject,
    ) -> ServiceResult<Project> {
        let actor = actor.require()?;
        policy::can_create_project(actor).require()?;

        let new_project = NewProject {
            key: validate::project_key(&request.key)?,
            name: validate::non_empty("name", &request.name)?,
            description: validate::optional_text(request.description),
            created_by: actor.user_id,
        };

        let project = self.store.insert_project(new_project).await?;

        let grant = NewMembership {
            project_id: project.id,
            user_id: actor.user_id,
            role: Role::Administrator,
        };
        if let Err(source) = self.store.insert_membership(grant).await {
            tracing::error!(
                project_id = %project.id,
                error = %source,
                "Project created without administrator membership"
            );
            return Err(ServiceError::ProjectPartiallyCreated {
                project_id: project.id,
                source,
            });
        }

        tracing::info!(project_id = %project.id, key = %project.key, "Project created");
        self.signal(ResourceKind::ProjectList, None);
        self.signal(ResourceKind::Project, Some(project.id));
        Ok(project)
    }

    /// ## Summary
    /// Replaces a project's name and description.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor administers the project.
    #[tracing::instrument(skip(self, actor, request))]
    pub async fn update_project(
        &self,
        actor: &ActorContext,
        project_id: Uuid,
        request: UpdateProject,
    ) -> ServiceResult<Project> {
        let actor = actor.require()?;
        let project = self.load_project(project_id).await?;
        let role = self.role_in(actor, project.id).await?;
        policy::can_manage_project(role).require()?;

        let changes = ProjectChangeset {
            name: validate::non_empty("name", &request.name)?,
            description: validate::optional_text(request.description),
        };

        let project = self
            .store
            .update_project(project.id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

        tracing::info!(project_id = %project.id, "Project updated");
        self.signal(ResourceKind::Project, Some(project.id));
        Ok(project)
    }

    /// ## Summary
    /// Deletes a project with all its memberships, tickets and comments.
    ///
    /// ## Errors
    /// Returns `Forbidden` unless the actor administers the project.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_project(&self, actor: &ActorContext, project_id: Uuid) -> ServiceResult<()> {
        let actor = actor.require()?;
        let project = self.load_project(project_id).await?;
        let role = self.role_in(actor, project.id).await?;
        policy::can_manage_project(role).require()?;

        if !self.store.delete_project(project.id).await? {
            return Err(ServiceError::not_found("Project", project_id));
        }

        tracing::info!(project_id = %project.id, key = %project.key, "Project deleted");
        self.signal(ResourceKind::ProjectList, None);
        self.signal(ResourceKind::Project, Some(project.id));
        Ok(())
    }
}
