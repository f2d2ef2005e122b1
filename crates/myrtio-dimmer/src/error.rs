use thiserror::Error;

/// Invalid dimmer configuration
///
/// Raised when a configuration is built or merged, before the processor
/// state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Tick interval must be at least one millisecond
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    /// Lower output bound is above the upper one
    #[error("min value {min} is greater than max value {max}")]
    InvertedBounds { min: f64, max: f64 },
    /// Step fraction is not a positive finite number
    #[error("step fraction {0} must be a positive finite number")]
    InvalidStep(f64),
}
