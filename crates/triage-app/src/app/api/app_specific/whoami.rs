use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use triage_service::auth::{ActorContext, depot::get_actor_from_depot};

/// ## Summary
/// Returns the authenticated actor as JSON.
/// The actor is retrieved from the depot set by the `AuthMiddleware`.
#[handler]
async fn whoami(depot: &Depot) -> Json<serde_json::Value> {
    match get_actor_from_depot(depot) {
        ActorContext::Authenticated(actor) => {
            Json(serde_json::to_value(actor).unwrap_or(json!(null)))
        }
        ActorContext::Anonymous => Json(json!({"status":"anonymous"})),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").get(whoami)
}
