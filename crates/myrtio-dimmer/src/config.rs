//! Dimmer configuration
//!
//! [`DimConfig`] is the complete configuration a processor runs with.
//! [`DimConfigUpdate`] is a partial overlay: present fields overwrite,
//! absent fields keep their current value.

use embassy_time::Duration;

use crate::error::ConfigError;

/// Default spacing between two emitted values
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Default progress increment per tick (10 steps)
pub const DEFAULT_STEP_FRACTION: f64 = 0.1;

/// Complete dimmer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimConfig {
    /// Spacing between successive output values
    pub tick_interval_ms: u64,
    /// Lower output bound
    pub min_value: f64,
    /// Upper output bound, also the scale of the easing curve
    pub max_value: f64,
    /// Progress increment per tick as a fraction of `[0, 1]`
    pub step_fraction: f64,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_value: 0.0,
            max_value: 100.0,
            step_fraction: DEFAULT_STEP_FRACTION,
        }
    }
}

impl DimConfig {
    /// Create a validated configuration
    pub fn new(
        tick_interval_ms: u64,
        min_value: f64,
        max_value: f64,
        step_fraction: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            tick_interval_ms,
            min_value,
            max_value,
            step_fraction,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.min_value.is_nan() || self.max_value.is_nan() || self.min_value > self.max_value {
            return Err(ConfigError::InvertedBounds {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if !self.step_fraction.is_finite() || self.step_fraction <= 0.0 {
            return Err(ConfigError::InvalidStep(self.step_fraction));
        }
        Ok(())
    }

    /// Tick interval as an embassy duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Return a copy with `update` applied, validated
    ///
    /// An empty update returns the configuration unchanged, without
    /// revalidating it.
    pub fn merged(&self, update: &DimConfigUpdate) -> Result<Self, ConfigError> {
        if update.is_empty() {
            return Ok(*self);
        }
        let mut config = *self;
        update.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Clamp a value into `[min_value, max_value]`
    pub fn clamp_value(&self, value: f64) -> f64 {
        value.max(self.min_value).min(self.max_value)
    }
}

/// Partial configuration update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimConfigUpdate {
    pub tick_interval_ms: Option<u64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step_fraction: Option<f64>,
}

impl DimConfigUpdate {
    /// Create an empty update (no changes)
    pub const fn new() -> Self {
        Self {
            tick_interval_ms: None,
            min_value: None,
            max_value: None,
            step_fraction: None,
        }
    }

    #[must_use]
    pub const fn with_tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = Some(interval);
        self
    }

    #[must_use]
    pub const fn with_min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    #[must_use]
    pub const fn with_max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    #[must_use]
    pub const fn with_step_fraction(mut self, step: f64) -> Self {
        self.step_fraction = Some(step);
        self
    }

    /// Set the step fraction from a step count (`1 / steps`)
    #[must_use]
    pub fn with_steps(self, steps: f64) -> Self {
        self.with_step_fraction(1.0 / steps)
    }

    /// Check if the update carries no field
    pub const fn is_empty(&self) -> bool {
        self.tick_interval_ms.is_none()
            && self.min_value.is_none()
            && self.max_value.is_none()
            && self.step_fraction.is_none()
    }

    /// Overwrite the fields of `config` present in this update
    pub fn apply_to(&self, config: &mut DimConfig) {
        if let Some(interval) = self.tick_interval_ms {
            config.tick_interval_ms = interval;
        }
        if let Some(min_value) = self.min_value {
            config.min_value = min_value;
        }
        if let Some(max_value) = self.max_value {
            config.max_value = max_value;
        }
        if let Some(step) = self.step_fraction {
            config.step_fraction = step;
        }
    }
}
