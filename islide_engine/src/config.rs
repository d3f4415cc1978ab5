use std::time::Duration;

use islide_layout::Breakpoints;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::{gesture::GestureConfig, timeline::TimelineConfig};

/// Tunables of an editor or player session. Every field has a default,
/// so a config file only needs the values it changes.
#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub breakpoints: Breakpoints,
    pub gesture: GestureConfig,
    pub timeline: TimelineConfig,
    #[default = 150]
    pub resize_debounce_ms: u64,
}

impl EngineConfig {
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
