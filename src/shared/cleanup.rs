use crate::shared::Result;
use std::sync::{Arc, Mutex, MutexGuard};

type CleanupFn = Box<dyn FnOnce() -> Result<()> + Send>;

#[derive(Default)]
struct Pending {
    actions: Vec<(String, CleanupFn)>,
    closed: bool,
}

/// Registry of release actions for resources acquired during a run.
///
/// Source providers register a release action the moment a resource exists.
/// The coordinator drains the registry during teardown, on every exit path.
/// Actions run in reverse registration order and each runs at most once.
///
/// Draining closes the registry: a resource registered afterwards (a worker
/// still finishing while teardown runs) is released on the spot.
#[derive(Clone, Default)]
pub struct CleanupRegistry {
    pending: Arc<Mutex<Pending>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a labelled release action
    pub fn register<F>(&self, label: impl Into<String>, action: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let label = label.into();
        {
            let mut pending = self.lock();
            if !pending.closed {
                tracing::debug!(resource = %label, "registered cleanup action");
                pending.actions.push((label, Box::new(action)));
                return;
            }
        }

        tracing::debug!(resource = %label, "registry closed, releasing immediately");
        if let Err(e) = release(&label, Box::new(action)) {
            tracing::warn!(error = %format!("{:#}", e), "late release failed");
        }
    }

    pub fn len(&self) -> usize {
        self.lock().actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().actions.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Runs every registered action, newest first, and closes the registry.
    ///
    /// All actions run even if some fail; the first failure is returned.
    pub fn run_all(&self) -> Result<()> {
        let actions: Vec<_> = {
            let mut pending = self.lock();
            pending.closed = true;
            pending.actions.drain(..).rev().collect()
        };
        let mut first_error = None;

        for (label, action) in actions {
            if let Err(e) = release(&label, action) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // A panicking cleanup action must not prevent the others from running
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn release(label: &str, action: CleanupFn) -> Result<()> {
    match action() {
        Ok(()) => {
            tracing::debug!(resource = %label, "released");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(resource = %label, error = %e, "failed to release resource");
            Err(e.context(format!("failed to release {}", label)))
        }
    }
}

impl std::fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("pending", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
