//! Dimmer command payloads
//!
//! These types match the JSON payloads accepted on the dimmer input:
//!
//! ```json
//! {"command":"DIM","target":0.8,"config":{"eventInterval":50,"steps":20}}
//! ```
//!
//! A bare number is accepted as a `DIM` towards that target.

use serde::Deserialize;
use thiserror::Error;

use crate::{config::DimConfigUpdate, error::ConfigError, operation::Operation};

/// Command selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DimCommand {
    #[default]
    Dim,
    Pause,
    Set,
    Reset,
}

impl DimCommand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DimCommand::Dim => "DIM",
            DimCommand::Pause => "PAUSE",
            DimCommand::Set => "SET",
            DimCommand::Reset => "RESET",
        }
    }
}

/// Partial configuration as sent on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimConfigUpdateDto {
    /// Tick interval in milliseconds
    #[serde(default)]
    pub event_interval: Option<u64>,
    /// Number of ticks for a full `[0, 1]` transition
    #[serde(default)]
    pub steps: Option<f64>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

impl DimConfigUpdateDto {
    /// Validate and convert into a processor update
    pub fn to_update(&self) -> Result<DimConfigUpdate, CommandError> {
        let mut update = DimConfigUpdate::new();
        if let Some(interval) = self.event_interval {
            if interval == 0 {
                return Err(ConfigError::ZeroTickInterval.into());
            }
            update = update.with_tick_interval_ms(interval);
        }
        if let Some(steps) = self.steps {
            if !steps.is_finite() || steps <= 0.0 {
                return Err(CommandError::InvalidSteps(steps));
            }
            update = update.with_steps(steps);
        }
        update.min_value = self.min_value;
        update.max_value = self.max_value;
        Ok(update)
    }
}

/// Command message payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct DimCommandMessage {
    #[serde(default)]
    pub command: DimCommand,
    /// Target progress in `[0, 1]`, required for `DIM` and `SET`
    #[serde(default)]
    pub target: Option<f64>,
    /// Starting progress override for `DIM`
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub config: Option<DimConfigUpdateDto>,
}

/// Invalid command payload
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    #[error("invalid message type provided")]
    Malformed,
    #[error("target {0} needs to be in [0,1]")]
    TargetOutOfRange(f64),
    #[error("start progress {0} needs to be in [0,1]")]
    FromOutOfRange(f64),
    #[error("{0} command requires a target")]
    MissingTarget(&'static str),
    #[error("steps {0} must be a positive number")]
    InvalidSteps(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DimCommandMessage {
    /// `DIM` towards `target`
    pub const fn dim(target: f64) -> Self {
        Self {
            command: DimCommand::Dim,
            target: Some(target),
            from: None,
            config: None,
        }
    }

    /// Command without target or config
    pub const fn bare(command: DimCommand) -> Self {
        Self {
            command,
            target: None,
            from: None,
            config: None,
        }
    }

    #[must_use]
    pub const fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub const fn with_from(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: DimConfigUpdateDto) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the payload and convert it into a processor operation
    pub fn to_operation(&self) -> Result<Operation, CommandError> {
        let config = self
            .config
            .as_ref()
            .map(DimConfigUpdateDto::to_update)
            .transpose()?;
        if let Some(target) = self.target {
            check_unit(target).map_err(CommandError::TargetOutOfRange)?;
        }

        let operation = match self.command {
            DimCommand::Dim => {
                let target = self.required_target()?;
                let from = match self.from {
                    Some(from) => Some(check_unit(from).map_err(CommandError::FromOutOfRange)?),
                    None => None,
                };
                Operation::Dim {
                    target,
                    from,
                    config,
                }
            }
            DimCommand::Pause => Operation::Pause,
            DimCommand::Set => Operation::Set {
                target: self.required_target()?,
                config,
            },
            DimCommand::Reset => Operation::Reset { config },
        };
        Ok(operation)
    }

    fn required_target(&self) -> Result<f64, CommandError> {
        self.target
            .ok_or(CommandError::MissingTarget(self.command.as_str()))
    }
}

/// Parse an input payload
///
/// Accepts either a command object or a bare target number.
pub fn parse_payload(payload: &str) -> Result<DimCommandMessage, CommandError> {
    let payload = payload.trim();
    if let Ok((target, _)) = serde_json_core::from_str::<f64>(payload) {
        return Ok(DimCommandMessage::dim(target));
    }
    match serde_json_core::from_str::<DimCommandMessage>(payload) {
        Ok((message, _)) => Ok(message),
        Err(err) => {
            log::warn!("dimmer: malformed payload: {:?}", err);
            Err(CommandError::Malformed)
        }
    }
}

/// Parse and validate an input payload in one go
pub fn parse_operation(payload: &str) -> Result<Operation, CommandError> {
    parse_payload(payload)?.to_operation()
}

fn check_unit(value: f64) -> Result<f64, f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(value)
    }
}
