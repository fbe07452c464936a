//! Shared handler state.

use std::sync::Arc;

use runway_core::api::DeliveryMode;
use runway_core::application::PlatformConnector;
use runway_core::domain::SessionSettings;

/// Built once at start-up; every session reads it, none mutates it.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn PlatformConnector>,
    pub settings: Arc<SessionSettings>,
    pub default_mode: DeliveryMode,
}

impl AppState {
    pub fn new(
        connector: Arc<dyn PlatformConnector>,
        settings: SessionSettings,
        default_mode: DeliveryMode,
    ) -> Self {
        Self {
            connector,
            settings: Arc::new(settings),
            default_mode,
        }
    }
}
