use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::COMMENTS_ROUTE_COMPONENT;
use super::extract::{json_body, path_id};
use crate::error::AppResult;
use crate::service_handler::get_services_from_depot;
use triage_db::model::comment::Comment;
use triage_service::auth::depot::get_actor_from_depot;
use triage_service::mutation::{CreateComment, UpdateComment};

/// ## Summary
/// POST /api/tickets/{ticket_id}/comments
///
/// ## Errors
/// Returns HTTP 403 when a Customer asks for an internal comment.
#[handler]
async fn create_comment(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Comment>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let ticket_id = path_id(req, "ticket_id")?;
    let body: CreateComment = json_body(req).await?;

    let comment = services
        .mutations
        .create_comment(&actor, ticket_id, body)
        .await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(comment))
}

#[handler]
async fn update_comment(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Comment>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let comment_id = path_id(req, "comment_id")?;
    let body: UpdateComment = json_body(req).await?;

    Ok(Json(
        services
            .mutations
            .update_comment(&actor, comment_id, body)
            .await?,
    ))
}

#[handler]
async fn delete_comment(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let comment_id = path_id(req, "comment_id")?;

    services.mutations.delete_comment(&actor, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes nested under a ticket.
#[must_use]
pub fn ticket_routes() -> Router {
    Router::with_path(COMMENTS_ROUTE_COMPONENT).post(create_comment)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(COMMENTS_ROUTE_COMPONENT).push(
        Router::with_path("{comment_id}")
            .patch(update_comment)
            .delete(delete_comment),
    )
}
