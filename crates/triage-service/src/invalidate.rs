//! Stale-view signals.
//!
//! The mutation service tells an [`Invalidator`] which cached presentation
//! views a successful write made stale. Delivery is fire-and-forget; a sink
//! never fails the mutation that emitted the signal.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use triage_core::types::ResourceKind;

/// A view that must be refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaleView {
    pub kind: ResourceKind,
    /// `None` for collection views such as the project list.
    pub id: Option<Uuid>,
}

pub trait Invalidator: Send + Sync {
    fn invalidate(&self, kind: ResourceKind, id: Option<Uuid>);
}

/// Fans signals out to every subscriber of a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastInvalidator {
    sender: broadcast::Sender<StaleView>,
}

impl BroadcastInvalidator {
    /// Subscribers lagging more than `capacity` signals behind skip ahead.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StaleView> {
        self.sender.subscribe()
    }
}

impl Invalidator for BroadcastInvalidator {
    fn invalidate(&self, kind: ResourceKind, id: Option<Uuid>) {
        match self.sender.send(StaleView { kind, id }) {
            Ok(receivers) => tracing::trace!(%kind, ?id, receivers, "View invalidated"),
            Err(_) => tracing::trace!(%kind, ?id, "View invalidated with no subscribers"),
        }
    }
}

/// Records signals in the trace log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInvalidator;

impl Invalidator for LogInvalidator {
    fn invalidate(&self, kind: ResourceKind, id: Option<Uuid>) {
        tracing::debug!(%kind, ?id, "View invalidated");
    }
}
