use crate::application::events::{EventBus, Subscription};
use crate::config::AppConfig;
use crate::shared::cleanup::CleanupRegistry;
use crate::shared::Result;

/// Process-wide state for one run: the effective configuration, the event
/// bus and the registry of resources to release at teardown.
///
/// Built once at startup and handed to every component explicitly.
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub bus: EventBus,
    pub cleanup: CleanupRegistry,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            bus: EventBus::new(),
            cleanup: CleanupRegistry::new(),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Effective configuration as recorded in the SBOM descriptor
    pub fn configuration_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }

    /// Detaches every remaining subscriber from the bus and releases any
    /// resource that teardown did not already release
    pub fn shutdown(&self) {
        self.bus.close();
        if let Err(e) = self.cleanup.run_all() {
            tracing::warn!(error = %format!("{:#}", e), "cleanup at shutdown failed");
        }
    }
}
