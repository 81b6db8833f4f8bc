//! Seeding helpers shared by the integration tests.

use std::sync::Arc;

use salvo::{Router, Service};

use triage_app::{app::api::routes, config::ConfigHandler, service_handler::ServiceHandler};
use triage_core::config::{
    AuthConfig, AuthMethod, DatabaseConfig, LoggingConfig, ServerConfig, Settings,
};
use triage_db::{
    db::enums::Role,
    model::{membership::NewMembership, project::Project, ticket::Ticket},
    store::Store,
};
use triage_service::{
    auth::{Actor, ActorContext, authenticate::provision_user},
    invalidate::Invalidator,
    mutation::{CreateProject, CreateTicket, MutationService},
    query::QueryService,
};

use crate::{MemoryStore, RecordingInvalidator};

/// Services wired to an in-memory store and a recording sink.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub invalidator: Arc<RecordingInvalidator>,
    pub mutations: MutationService,
    pub queries: QueryService,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let invalidator = Arc::new(RecordingInvalidator::new());
        let mutations = MutationService::new(
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::clone(&invalidator) as Arc<dyn Invalidator>,
        );
        let queries = QueryService::new(Arc::clone(&store) as Arc<dyn Store>);

        Self {
            store,
            invalidator,
            mutations,
            queries,
        }
    }

    /// ## Summary
    /// Provisions a user and returns it as an authenticated actor.
    ///
    /// ## Errors
    /// Returns an error if the store rejects the user.
    pub async fn actor(&self, email: &str) -> anyhow::Result<ActorContext> {
        let user = provision_user(self.store.as_ref(), email, None).await?;
        Ok(ActorContext::Authenticated(Actor::from_user(&user)))
    }

    /// ## Summary
    /// Creates a project through the mutation service, so `admin` holds the
    /// Administrator membership. Clears the recorded signals.
    ///
    /// ## Errors
    /// Returns an error if project creation fails.
    pub async fn project(&self, admin: &ActorContext, key: &str) -> anyhow::Result<Project> {
        let project = self
            .mutations
            .create_project(
                admin,
                CreateProject {
                    name: format!("{key} project"),
                    key: key.to_string(),
                    description: None,
                },
            )
            .await?;
        self.invalidator.take();
        Ok(project)
    }

    /// ## Summary
    /// Provisions a user and adds it to `project` with `role`, bypassing the
    /// policy.
    ///
    /// ## Errors
    /// Returns an error if the user or the membership cannot be stored.
    pub async fn member(
        &self,
        project: &Project,
        email: &str,
        role: Role,
    ) -> anyhow::Result<ActorContext> {
        let ctx = self.actor(email).await?;
        let actor = ctx.require()?;
        self.store
            .insert_membership(NewMembership {
                project_id: project.id,
                user_id: actor.user_id,
                role,
            })
            .await?;
        Ok(ctx)
    }

    /// ## Summary
    /// Reports a ticket as `reporter`. Clears the recorded signals.
    ///
    /// ## Errors
    /// Returns an error if ticket creation fails.
    pub async fn ticket(
        &self,
        reporter: &ActorContext,
        project: &Project,
        title: &str,
    ) -> anyhow::Result<Ticket> {
        let ticket = self
            .mutations
            .create_ticket(
                reporter,
                project.id,
                CreateTicket {
                    title: title.to_string(),
                    description: None,
                    priority: None,
                    assignee_id: None,
                    due_date: None,
                },
            )
            .await?;
        self.invalidator.take();
        Ok(ticket)
    }

    /// ## Summary
    /// Builds the HTTP service over this fixture's store, authenticating
    /// callers by the default proxy header.
    #[must_use]
    pub fn http_service(&self) -> Service {
        self.http_service_with(proxy_settings())
    }

    /// Builds the HTTP service with the given settings.
    #[must_use]
    pub fn http_service_with(&self, settings: Settings) -> Service {
        let router = Router::new()
            .hoop(ServiceHandler::new(
                Arc::clone(&self.store) as Arc<dyn Store>,
                Arc::clone(&self.invalidator) as Arc<dyn Invalidator>,
            ))
            .hoop(ConfigHandler { settings })
            .push(routes());
        Service::new(router)
    }
}

/// Settings for proxy-header authentication; the database is never contacted.
#[must_use]
pub fn proxy_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://localhost/triage_test".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        auth: AuthConfig {
            method: AuthMethod::Proxy,
            proxy: None,
            single_user: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8698,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// Returns the user id of an authenticated context.
///
/// ## Panics
/// Panics for an anonymous context.
#[must_use]
pub fn user_id(ctx: &ActorContext) -> uuid::Uuid {
    match ctx {
        ActorContext::Authenticated(actor) => actor.user_id,
        ActorContext::Anonymous => panic!("expected an authenticated actor"),
    }
}
