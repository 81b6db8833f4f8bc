use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use triage_app::app::api::routes;
use triage_app::config::ConfigHandler;
use triage_app::service_handler::ServiceHandler;
use triage_core::config::load_config;
use triage_db::db::{connection::create_pool, migrate::run_migrations, pg_store::PgStore};
use triage_service::invalidate::BroadcastInvalidator;

/// Signals buffered per subscriber before it starts skipping.
const INVALIDATION_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Triage server");

    let config = load_config()?;

    tracing::info!(auth_method = ?config.auth.method, bind_addr = %config.server.bind_addr(), "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    if config.database.run_migrations {
        run_migrations(&config.database.url).await?;
        tracing::info!("Database migrations applied.");
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let invalidator = BroadcastInvalidator::new(INVALIDATION_CAPACITY);
    let mut stale_views = invalidator.subscribe();
    tokio::spawn(async move {
        loop {
            match stale_views.recv().await {
                Ok(view) => tracing::debug!(kind = %view.kind, id = ?view.id, "Stale view"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Stale view subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ServiceHandler::new(
            Arc::new(PgStore::new(pool)),
            Arc::new(invalidator),
        ))
        .hoop(ConfigHandler { settings: config })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
