use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::MEMBERS_ROUTE_COMPONENT;
use super::extract::{json_body, path_id};
use crate::error::AppResult;
use crate::service_handler::get_services_from_depot;
use triage_db::model::membership::Membership;
use triage_service::auth::depot::get_actor_from_depot;
use triage_service::mutation::{AddMember, UpdateMemberRole};

/// ## Summary
/// POST /api/projects/{project_id}/members - Add an existing user by email.
///
/// ## Errors
/// Returns HTTP 404 if no user has the email, HTTP 409 if already a member.
#[handler]
async fn add_member(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Membership>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let project_id = path_id(req, "project_id")?;
    let body: AddMember = json_body(req).await?;

    let membership = services
        .mutations
        .add_member(&actor, project_id, body)
        .await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(membership))
}

#[handler]
async fn update_member_role(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Membership>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let membership_id = path_id(req, "membership_id")?;
    let body: UpdateMemberRole = json_body(req).await?;

    Ok(Json(
        services
            .mutations
            .update_member_role(&actor, membership_id, body)
            .await?,
    ))
}

#[handler]
async fn remove_member(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let membership_id = path_id(req, "membership_id")?;

    services.mutations.remove_member(&actor, membership_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes nested under a project.
#[must_use]
pub fn project_routes() -> Router {
    Router::with_path(MEMBERS_ROUTE_COMPONENT).post(add_member)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(MEMBERS_ROUTE_COMPONENT).push(
        Router::with_path("{membership_id}")
            .patch(update_member_role)
            .delete(remove_member),
    )
}
