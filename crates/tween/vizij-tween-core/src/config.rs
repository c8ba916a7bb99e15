//! Configuration for vizij-tween-core.

use serde::{Deserialize, Serialize};

/// Settings shared by every animator a registry creates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit appended to bare numbers for properties that carry a length.
    pub length_unit: String,
    /// Delay handed to the timer fallback when no frame primitive is usable.
    pub fallback_delay_ms: i32,
    /// Skip frame-primitive detection and always use the timer fallback.
    pub force_timer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            length_unit: "px".to_string(),
            fallback_delay_ms: 0,
            force_timer: false,
        }
    }
}
