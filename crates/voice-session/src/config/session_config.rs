use crate::config::default_settle_delay_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voice_session_core::{CoordinatorConfig, Scenario};

/// Voice session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long "Interrupted" is shown before the controls return to idle.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Scenario presented at startup.
    #[serde(default)]
    pub scenario: Scenario,

    /// Stable client identifier sent with interrupt notices (generated if absent).
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

impl SessionConfig {
    /// Coordinator settings derived from this section.
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            scenario: Scenario::default(),
            client_id: None,
        }
    }
}
