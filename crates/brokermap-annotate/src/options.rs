use std::time::Duration;

use brokermap_core::{AppConfig, RECENT_DEALS_CAP};

use crate::marker::MarkerIcon;
use crate::scheduler::ThrottlePolicy;
use crate::surface::TileLayer;
use crate::viewport::ViewportPolicy;

pub const DEFAULT_CONTAINER: &str = "recent-deals-map";
pub const DEFAULT_FIT_SETTLE: Duration = Duration::from_secs(1);

/// Tunables for one [`crate::MapController`].
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub container: String,
    pub deal_cap: usize,
    pub throttle: ThrottlePolicy,
    pub viewport: ViewportPolicy,
    /// Wait between the last attempt and the viewport fit.
    pub fit_settle: Duration,
    pub tile_layer: TileLayer,
    pub icon: MarkerIcon,
}

impl WorkflowOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            deal_cap: config.recent_deals_cap,
            throttle: ThrottlePolicy::new(config.geocode_delay()),
            fit_settle: config.fit_settle(),
            ..Self::default()
        }
    }
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_owned(),
            deal_cap: RECENT_DEALS_CAP,
            throttle: ThrottlePolicy::default(),
            viewport: ViewportPolicy::default(),
            fit_settle: DEFAULT_FIT_SETTLE,
            tile_layer: TileLayer::default(),
            icon: MarkerIcon::default(),
        }
    }
}
