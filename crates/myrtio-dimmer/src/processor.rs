//! Dim processor - the value transition state machine
//!
//! The processor owns the committed output value, the progress along the
//! easing curve and the token of the transition currently allowed to write
//! them. Every operation rotates or clears that token before it mutates
//! anything, which is the only supersession mechanism: a transition that
//! no longer holds the active token stops without emitting.
//!
//! All state lives behind a blocking mutex, so a transition being polled by
//! one task and a `pause`/`set` issued from another never interleave inside
//! a tick.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{
    Mutex,
    raw::{CriticalSectionRawMutex, RawMutex},
};

use crate::{
    clock::Clock,
    config::{DimConfig, DimConfigUpdate},
    easing::{EaseFn, linear, round3},
    error::ConfigError,
    operation::Operation,
    transition::{DimContext, DimOutput, Tick, Transition},
};

/// Processor state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No transition holds the active token
    Idle,
    /// A transition is stepping towards its target
    Running,
}

/// Identifies one transition run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationToken(u32);

/// Mutable processor state
#[derive(Debug)]
struct ProcessorState {
    config: DimConfig,
    current_value: f64,
    progress: f64,
    active: Option<CancellationToken>,
    next_token: u32,
}

impl ProcessorState {
    const fn new(config: DimConfig) -> Self {
        Self {
            config,
            current_value: config.min_value,
            progress: 0.0,
            active: None,
            next_token: 0,
        }
    }

    /// Invalidate the running transition, if any
    fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Issue a new token, invalidating the previous one
    fn rotate(&mut self) -> CancellationToken {
        let token = CancellationToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.active = Some(token);
        token
    }

    fn is_active(&self, token: CancellationToken) -> bool {
        self.active == Some(token)
    }

    fn apply_config(&mut self, config: DimConfig) {
        self.config = config;
        self.current_value = config.clamp_value(self.current_value);
    }

    fn commit(&mut self, value: f64, progress: f64) {
        self.current_value = value;
        self.progress = progress;
    }
}

/// Value transition engine
///
/// Generic over the [`Clock`] driving its transitions and over the raw
/// mutex guarding its state.
pub struct DimProcessor<C: Clock, M: RawMutex = CriticalSectionRawMutex> {
    clock: C,
    /// Construction time configuration, the baseline of `set`/`reset`
    defaults: DimConfig,
    ease: EaseFn,
    state: Mutex<M, RefCell<ProcessorState>>,
}

impl<C: Clock, M: RawMutex> DimProcessor<C, M> {
    /// Create a processor at zero progress, outputting `min_value`
    pub fn new(clock: C, config: DimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            clock,
            defaults: config,
            ease: linear,
            state: Mutex::new(RefCell::new(ProcessorState::new(config))),
        })
    }

    /// Replace the easing curve
    #[must_use]
    pub fn with_easing(mut self, ease: EaseFn) -> Self {
        self.ease = ease;
        self
    }

    /// Get the state machine state
    pub fn state(&self) -> EngineState {
        self.with_state(|state| {
            if state.active.is_some() {
                EngineState::Running
            } else {
                EngineState::Idle
            }
        })
    }

    /// Get the last committed output value
    pub fn current_value(&self) -> f64 {
        self.with_state(|state| state.current_value)
    }

    /// Get the last committed progress
    pub fn progress(&self) -> f64 {
        self.with_state(|state| state.progress)
    }

    /// Get the live configuration
    pub fn config(&self) -> DimConfig {
        self.with_state(|state| state.config)
    }

    /// Get the construction time configuration
    pub fn defaults(&self) -> DimConfig {
        self.defaults
    }

    /// Run an operation, returning the sequence of values it emits
    pub fn execute(&self, operation: Operation) -> Result<DimOutput<'_, C, M>, ConfigError> {
        let output = match operation {
            Operation::Dim {
                target,
                from,
                config,
            } => DimOutput::Transition(self.start_from(from, target, config.as_ref())?),
            Operation::Pause => DimOutput::single(self.pause()),
            Operation::Set { target, config } => {
                DimOutput::single(self.set(target, config.as_ref())?)
            }
            Operation::Reset { config } => DimOutput::single(self.reset(config.as_ref())?),
        };
        Ok(output)
    }

    /// Start a transition from the committed progress towards `target`
    ///
    /// The returned sequence emits nothing until its first tick.
    pub fn start(
        &self,
        target: f64,
        update: Option<&DimConfigUpdate>,
    ) -> Result<Transition<'_, C, M>, ConfigError> {
        self.start_from(None, target, update)
    }

    /// Start a transition, optionally overriding the starting progress
    ///
    /// An override also recomputes the committed value so that value and
    /// progress stay consistent.
    pub fn start_from(
        &self,
        from: Option<f64>,
        target: f64,
        update: Option<&DimConfigUpdate>,
    ) -> Result<Transition<'_, C, M>, ConfigError> {
        let context = self.with_state(|state| {
            let config = match update {
                Some(update) => state.config.merged(update)?,
                None => state.config,
            };
            if state.cancel() {
                log::debug!("dimmer: superseding running transition");
            }
            state.apply_config(config);
            if let Some(from) = from {
                let progress = clamp_progress(from, state.progress);
                let value = self.value_at(&config, progress);
                state.commit(value, progress);
            }
            let target = clamp_progress(target, state.progress);
            let token = state.rotate();
            Ok::<_, ConfigError>(DimContext::new(
                token,
                target,
                state.progress,
                config,
                self.ease,
            ))
        })?;

        log::debug!(
            "dimmer: start target={} progress={} sign={}",
            context.target(),
            context.progress(),
            context.sign()
        );
        let ticks = self.clock.ticks(context.config().tick_interval());
        Ok(Transition::new(self, context, ticks))
    }

    /// Stop the running transition and return the committed value
    pub fn pause(&self) -> f64 {
        let value = self.with_state(|state| {
            state.cancel();
            state.current_value
        });
        log::debug!("dimmer: pause at {}", value);
        value
    }

    /// Jump to `target` progress, bypassing the step grid
    ///
    /// `update` is applied on top of the construction time configuration,
    /// not the live one.
    pub fn set(&self, target: f64, update: Option<&DimConfigUpdate>) -> Result<f64, ConfigError> {
        let config = match update {
            Some(update) => self.defaults.merged(update)?,
            None => self.defaults,
        };
        let (value, progress) = self.with_state(|state| {
            let progress = clamp_progress(target, state.progress);
            let value = self.value_at(&config, progress);
            state.cancel();
            state.apply_config(config);
            state.commit(value, progress);
            (value, progress)
        });
        log::debug!("dimmer: set progress={} value={}", progress, value);
        Ok(value)
    }

    /// Jump back to zero progress
    pub fn reset(&self, update: Option<&DimConfigUpdate>) -> Result<f64, ConfigError> {
        self.set(0.0, update)
    }

    pub(crate) fn is_active(&self, token: CancellationToken) -> bool {
        self.with_state(|state| state.is_active(token))
    }

    /// Give up the active token if `token` still holds it
    pub(crate) fn release(&self, token: CancellationToken) {
        self.with_state(|state| {
            if state.is_active(token) {
                state.cancel();
                log::debug!("dimmer: transition dropped before completion");
            }
        });
    }

    /// Compute and commit one tick of the transition owning `context`
    ///
    /// The token check, the computation and the commit happen in one lock
    /// section, so a cancelled transition cannot write state.
    pub(crate) fn advance(&self, context: &mut DimContext) -> Tick {
        self.with_state(|state| {
            if !state.is_active(context.token()) {
                return Tick::Cancelled;
            }
            match context.step() {
                Some((value, progress)) => {
                    state.commit(value, progress);
                    log::trace!("dimmer: tick value={} progress={}", value, progress);
                    Tick::Value(value)
                }
                None => {
                    state.cancel();
                    log::debug!("dimmer: target {} reached", context.target());
                    Tick::Completed
                }
            }
        })
    }

    fn value_at(&self, config: &DimConfig, progress: f64) -> f64 {
        config.clamp_value(round3((self.ease)(progress) * config.max_value))
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ProcessorState) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Clamp a requested progress into `[0, 1]`, NaN keeps `current`
fn clamp_progress(requested: f64, current: f64) -> f64 {
    if requested.is_nan() {
        current
    } else {
        requested.clamp(0.0, 1.0)
    }
}
