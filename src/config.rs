use myrtio_dimmer::{ConfigError, DimConfig, config::DEFAULT_TICK_INTERVAL_MS};
use serde::Deserialize;
use thiserror::Error;

/// Default number of ticks for a full transition
pub const DEFAULT_STEPS: f64 = 10.0;

/// Dimmer node configuration
///
/// Passed as a JSON object in the first command line argument, e.g.
/// `{"eventInterval":50,"steps":20,"minValue":0,"maxValue":255}`.
/// Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    #[serde(default = "default_event_interval")]
    pub event_interval: u64,
    #[serde(default = "default_steps")]
    pub steps: f64,
    #[serde(default)]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

const fn default_event_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

const fn default_steps() -> f64 {
    DEFAULT_STEPS
}

const fn default_max_value() -> f64 {
    100.0
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            event_interval: default_event_interval(),
            steps: default_steps(),
            min_value: 0.0,
            max_value: default_max_value(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NodeConfigError {
    /// Argument is not a valid configuration object
    #[error("malformed node configuration")]
    Malformed,
    /// Configuration values are out of range
    #[error("invalid node configuration: {0}")]
    Invalid(#[from] ConfigError),
}

impl NodeConfig {
    /// Parse the configuration from its JSON form
    pub fn parse(raw: &str) -> Result<Self, NodeConfigError> {
        serde_json_core::from_str::<NodeConfig>(raw)
            .map(|(config, _)| config)
            .map_err(|_| NodeConfigError::Malformed)
    }

    /// Build the processor configuration, `step = 1 / steps`
    pub fn to_dim_config(&self) -> Result<DimConfig, NodeConfigError> {
        DimConfig::new(
            self.event_interval,
            self.min_value,
            self.max_value,
            1.0 / self.steps,
        )
        .map_err(NodeConfigError::from)
    }
}
