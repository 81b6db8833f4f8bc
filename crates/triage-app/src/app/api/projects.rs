use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::extract::{json_body, path_id};
use super::{PROJECTS_ROUTE_COMPONENT, members, tickets};
use crate::error::AppResult;
use crate::service_handler::get_services_from_depot;
use triage_db::model::project::{Project, ProjectWithRole};
use triage_service::auth::depot::get_actor_from_depot;
use triage_service::mutation::{CreateProject, UpdateProject};
use triage_service::query::ProjectOverview;

/// ## Summary
/// GET /api/projects - Projects the caller belongs to, with their role.
#[handler]
async fn list_projects(depot: &mut Depot) -> AppResult<Json<Vec<ProjectWithRole>>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);

    Ok(Json(services.queries.list_projects(&actor).await?))
}

/// ## Summary
/// POST /api/projects - Create a project; the caller becomes its administrator.
///
/// ## Errors
/// Returns HTTP 400 for a malformed key, HTTP 409 if the key is taken.
#[handler]
async fn create_project(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Project>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let body: CreateProject = json_body(req).await?;

    let project = services.mutations.create_project(&actor, body).await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(project))
}

/// ## Summary
/// GET /api/projects/{project_id} - Project with tickets and members.
#[handler]
async fn project_overview(req: &mut Request, depot: &mut Depot) -> AppResult<Json<ProjectOverview>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let project_id = path_id(req, "project_id")?;

    Ok(Json(
        services.queries.project_overview(&actor, project_id).await?,
    ))
}

#[handler]
async fn update_project(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Project>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let project_id = path_id(req, "project_id")?;
    let body: UpdateProject = json_body(req).await?;

    Ok(Json(
        services
            .mutations
            .update_project(&actor, project_id, body)
            .await?,
    ))
}

#[handler]
async fn delete_project(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let project_id = path_id(req, "project_id")?;

    services.mutations.delete_project(&actor, project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PROJECTS_ROUTE_COMPONENT)
        .get(list_projects)
        .post(create_project)
        .push(
            Router::with_path("{project_id}")
                .get(project_overview)
                .patch(update_project)
                .delete(delete_project)
                .push(members::project_routes())
                .push(tickets::project_routes()),
        )
}
