use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use triage_core::types::ResourceKind;
use triage_service::invalidate::{Invalidator, StaleView};

/// Invalidation sink that keeps every signal for later assertions.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    views: Mutex<Vec<StaleView>>,
}

impl RecordingInvalidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StaleView>> {
        match self.views.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.views.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Returns the signals recorded so far and forgets them.
    pub fn take(&self) -> Vec<StaleView> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn recorded(&self) -> Vec<StaleView> {
        self.lock().clone()
    }
}

impl Invalidator for RecordingInvalidator {
    fn invalidate(&self, kind: ResourceKind, id: Option<Uuid>) {
        self.lock().push(StaleView { kind, id });
    }
}

/// Shorthand for building expected signals.
#[must_use]
pub const fn view(kind: ResourceKind, id: Option<Uuid>) -> StaleView {
    StaleView { kind, id }
}
