use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use triage_core::error::CoreError;
use triage_db::store::Store;
use triage_service::{invalidate::Invalidator, mutation::MutationService, query::QueryService};

/// Services shared by every request.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub mutations: MutationService,
    pub queries: QueryService,
}

pub struct ServiceHandler {
    services: Arc<Services>,
}

impl ServiceHandler {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, invalidator: Arc<dyn Invalidator>) -> Self {
        let services = Services {
            mutations: MutationService::new(Arc::clone(&store), invalidator),
            queries: QueryService::new(Arc::clone(&store)),
            store,
        };
        Self {
            services: Arc::new(services),
        }
    }
}

#[async_trait]
impl salvo::Handler for ServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.services));
    }
}

/// ## Summary
/// Retrieves the shared services from the depot.
///
/// ## Errors
/// Returns an error if the services are not found in the depot.
pub fn get_services_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Services>> {
    depot
        .obtain::<Arc<Services>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Services not found in depot").into())
}
