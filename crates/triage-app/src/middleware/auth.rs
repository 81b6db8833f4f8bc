use salvo::{Depot, Writer};
use tracing::error;

use crate::error::AppError;
use crate::{config::get_config_from_depot, service_handler::get_services_from_depot};
use triage_service::auth::{ActorContext, authenticate::authenticate, depot::depot_keys};
use triage_service::error::ServiceError;

/// ## Summary
/// Middleware handler for authentication.
///
/// Resolves the caller through the configured authentication method and
/// stores the resulting [`ActorContext`] in the depot. A caller without an
/// identity continues as anonymous; operations that need an actor reject it
/// themselves.
///
/// ## Side Effects
/// - Provisions a user row on the first request of a new identity
/// - Inserts the actor into the depot under `depot_keys::ACTOR`
///
/// ## Errors
/// Responds 503 if the store is unreachable and 500 for any other
/// authentication failure.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                e.write(req, depot, res).await;
                ctrl.skip_rest();
                return;
            }
        };

        let services = match get_services_from_depot(depot) {
            Ok(services) => services,
            Err(e) => {
                error!(error = ?e, "Failed to get services from depot");
                e.write(req, depot, res).await;
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req, services.store.as_ref(), &config).await {
            Ok(actor) => {
                tracing::debug!(user_email = %actor.email, "User authenticated successfully");
                depot.insert(depot_keys::ACTOR, ActorContext::Authenticated(actor));
            }
            Err(ServiceError::NotAuthenticated) => {
                tracing::debug!("Request not authenticated, treating as anonymous");
                depot.insert(depot_keys::ACTOR, ActorContext::Anonymous);
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                AppError::from(service_err).write(req, depot, res).await;
                ctrl.skip_rest();
            }
        }
    }
}
