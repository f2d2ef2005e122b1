use crate::config::DimConfigUpdate;

/// Operations accepted by the dim processor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Step towards `target` progress, one value per tick
    Dim {
        target: f64,
        /// Progress to start from instead of the last committed one
        from: Option<f64>,
        config: Option<DimConfigUpdate>,
    },
    /// Stop the running transition and report the current value
    Pause,
    /// Jump to `target` progress immediately
    Set {
        target: f64,
        config: Option<DimConfigUpdate>,
    },
    /// Jump to zero progress immediately
    Reset { config: Option<DimConfigUpdate> },
}

impl Operation {
    /// Short name used in logs and status reports
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Dim { .. } => "dim",
            Operation::Pause => "pause",
            Operation::Set { .. } => "set",
            Operation::Reset { .. } => "reset",
        }
    }
}
