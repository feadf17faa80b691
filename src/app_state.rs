use chrono::{DateTime, Utc};

use crate::{
    compliance::ComplianceStore, config_loader::ZenConfig, failure::FailureStore,
    narrative::NarrativeStore, observability::ObservabilityStore, platform::PlatformStore,
    regulation::RegulationStore,
};

/// Shared application state: the per-feature in-memory stores plus config.
/// Handlers receive it as `State<Arc<AppState>>`.
pub struct AppState {
    pub config: ZenConfig,
    pub started_at: DateTime<Utc>,
    pub compliance: ComplianceStore,
    pub regulation: RegulationStore,
    pub observability: ObservabilityStore,
    pub narrative: NarrativeStore,
    pub failure: FailureStore,
    pub platform: PlatformStore,
}

impl AppState {
    pub fn new(config: ZenConfig) -> Self {
        Self {
            config,
            started_at: Utc::now(),
            compliance: ComplianceStore::default(),
            regulation: RegulationStore::default(),
            observability: ObservabilityStore::default(),
            narrative: NarrativeStore::default(),
            failure: FailureStore::default(),
            platform: PlatformStore::default(),
        }
    }
}
