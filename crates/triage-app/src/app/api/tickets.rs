use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::extract::{json_body, path_id};
use super::{TICKETS_ROUTE_COMPONENT, comments};
use crate::error::AppResult;
use crate::service_handler::get_services_from_depot;
use triage_db::model::ticket::Ticket;
use triage_service::auth::depot::get_actor_from_depot;
use triage_service::mutation::{ChangeTicketStatus, CreateTicket, TicketUpdate, TicketUpdateOutcome};
use triage_service::query::TicketDetail;

/// ## Summary
/// POST /api/projects/{project_id}/tickets - Report a ticket.
#[handler]
async fn create_ticket(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Ticket>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let project_id = path_id(req, "project_id")?;
    let body: CreateTicket = json_body(req).await?;

    let ticket = services
        .mutations
        .create_ticket(&actor, project_id, body)
        .await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(ticket))
}

/// ## Summary
/// GET /api/tickets/{ticket_id} - Ticket with the comments the caller may see.
#[handler]
async fn ticket_detail(req: &mut Request, depot: &mut Depot) -> AppResult<Json<TicketDetail>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let ticket_id = path_id(req, "ticket_id")?;

    Ok(Json(services.queries.ticket_detail(&actor, ticket_id).await?))
}

/// ## Summary
/// PATCH /api/tickets/{ticket_id} - Update the fields the caller may change.
///
/// The response lists the applied and the dropped fields.
#[handler]
async fn update_ticket(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<TicketUpdateOutcome>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let ticket_id = path_id(req, "ticket_id")?;
    let body: TicketUpdate = json_body(req).await?;

    Ok(Json(
        services
            .mutations
            .update_ticket(&actor, ticket_id, body)
            .await?,
    ))
}

/// ## Summary
/// PUT /api/tickets/{ticket_id}/status
#[handler]
async fn change_ticket_status(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Ticket>> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let ticket_id = path_id(req, "ticket_id")?;
    let body: ChangeTicketStatus = json_body(req).await?;

    Ok(Json(
        services
            .mutations
            .change_ticket_status(&actor, ticket_id, body)
            .await?,
    ))
}

#[handler]
async fn delete_ticket(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let services = get_services_from_depot(depot)?;
    let actor = get_actor_from_depot(depot);
    let ticket_id = path_id(req, "ticket_id")?;

    services.mutations.delete_ticket(&actor, ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes nested under a project.
#[must_use]
pub fn project_routes() -> Router {
    Router::with_path(TICKETS_ROUTE_COMPONENT).post(create_ticket)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TICKETS_ROUTE_COMPONENT).push(
        Router::with_path("{ticket_id}")
            .get(ticket_detail)
            .patch(update_ticket)
            .delete(delete_ticket)
            .push(Router::with_path("status").put(change_ticket_status))
            .push(comments::ticket_routes()),
    )
}
