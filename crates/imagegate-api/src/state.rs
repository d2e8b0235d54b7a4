//! Shared, read-only application state.

use imagegate_auth::{Gate, Policy};

use crate::GateConfig;
use crate::files::ImageStore;

/// Everything a handler needs, built once from [`GateConfig`].
#[derive(Debug)]
pub struct AppState {
    /// The configuration the state was built from.
    pub config: GateConfig,
    /// Policy for the auth status endpoint.
    pub status_policy: Policy,
    /// Gate for mutating routes.
    pub gate: Gate,
    /// Output directory access.
    pub store: ImageStore,
}

impl AppState {
    /// Build state from a validated configuration.
    pub fn new(config: GateConfig) -> Self {
        let status_policy = config.auth.status_policy();
        let gate = Gate::from_config(&config.auth);
        let store = ImageStore::new(config.storage.output_dir.clone());
        Self {
            config,
            status_policy,
            gate,
            store,
        }
    }
}
