//! Transition sequences
//!
//! A [`Transition`] is the lazily evaluated sequence returned by
//! [`DimProcessor::start`]. It is restarted, never resumed: each `start`
//! builds a new one from the committed progress. It ends either when the
//! target is reached or when a later operation takes the active token.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::{
    clock::{Clock, TickSource},
    config::DimConfig,
    easing::{EaseFn, round3},
    processor::{CancellationToken, DimProcessor},
};

/// Per-run transition context
///
/// Captured when the transition starts. Later configuration merges do not
/// reach a running context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DimContext {
    token: CancellationToken,
    target: f64,
    sign: f64,
    progress: f64,
    config: DimConfig,
    ease: EaseFn,
}

impl DimContext {
    pub(crate) fn new(
        token: CancellationToken,
        target: f64,
        progress: f64,
        config: DimConfig,
        ease: EaseFn,
    ) -> Self {
        let sign = if target >= progress { 1.0 } else { -1.0 };
        Self {
            token,
            target,
            sign,
            progress,
            config,
            ease,
        }
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token
    }

    pub(crate) fn target(&self) -> f64 {
        self.target
    }

    pub(crate) fn sign(&self) -> f64 {
        self.sign
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn config(&self) -> &DimConfig {
        &self.config
    }

    /// Boundary ticks are inclusive, so the target itself is emitted
    fn target_not_reached(&self, progress: f64) -> bool {
        if self.sign > 0.0 {
            progress <= self.target
        } else {
            progress >= self.target
        }
    }

    /// Advance one step
    ///
    /// Returns the clamped value and progress to commit, or `None` once the
    /// step crosses the target.
    pub(crate) fn step(&mut self) -> Option<(f64, f64)> {
        let progress = self.progress + self.sign * self.config.step_fraction;
        let raw = round3((self.ease)(progress) * self.config.max_value);
        if !self.target_not_reached(progress) {
            return None;
        }
        self.progress = progress.clamp(0.0, 1.0);
        Some((self.config.clamp_value(raw), self.progress))
    }
}

/// Result of one processor tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Tick {
    Value(f64),
    Completed,
    Cancelled,
}

/// Why a sequence stopped emitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEnd {
    /// The target progress was reached
    Completed,
    /// A later operation superseded the transition
    Cancelled,
}

/// Running transition
///
/// Emits one value per tick. Dropping an unfinished transition cancels it,
/// leaving the committed value and progress where the last tick put them.
pub struct Transition<'a, C: Clock, M: RawMutex> {
    processor: &'a DimProcessor<C, M>,
    context: DimContext,
    ticks: C::Ticks,
    end: Option<TransitionEnd>,
}

impl<'a, C: Clock, M: RawMutex> Transition<'a, C, M> {
    pub(crate) fn new(
        processor: &'a DimProcessor<C, M>,
        context: DimContext,
        ticks: C::Ticks,
    ) -> Self {
        Self {
            processor,
            context,
            ticks,
            end: None,
        }
    }

    /// Wait for the next value
    ///
    /// Returns `None` once the transition has ended. A superseded
    /// transition returns `None` without waiting when the supersession
    /// happened before the call, and at the pending tick otherwise.
    pub async fn next(&mut self) -> Option<f64> {
        if self.end.is_some() {
            return None;
        }
        if !self.processor.is_active(self.context.token()) {
            self.end = Some(TransitionEnd::Cancelled);
            return None;
        }

        self.ticks.next().await;

        match self.processor.advance(&mut self.context) {
            Tick::Value(value) => Some(value),
            Tick::Completed => {
                self.end = Some(TransitionEnd::Completed);
                None
            }
            Tick::Cancelled => {
                self.end = Some(TransitionEnd::Cancelled);
                None
            }
        }
    }

    /// Get the end reason, `None` while still emitting
    pub fn end(&self) -> Option<TransitionEnd> {
        self.end
    }

    /// Get the target progress
    pub fn target(&self) -> f64 {
        self.context.target()
    }

    /// Get the direction of travel, `1.0` up or `-1.0` down
    pub fn sign(&self) -> f64 {
        self.context.sign()
    }
}

impl<C: Clock, M: RawMutex> Drop for Transition<'_, C, M> {
    fn drop(&mut self) {
        if self.end.is_none() {
            self.processor.release(self.context.token());
        }
    }
}

/// Output of any processor operation
///
/// Transitions emit many values over time, the immediate operations
/// exactly one.
pub enum DimOutput<'a, C: Clock, M: RawMutex> {
    Single(Option<f64>),
    Transition(Transition<'a, C, M>),
}

impl<C: Clock, M: RawMutex> DimOutput<'_, C, M> {
    pub(crate) const fn single(value: f64) -> Self {
        Self::Single(Some(value))
    }

    /// Wait for the next value, `None` when the sequence is over
    pub async fn next(&mut self) -> Option<f64> {
        match self {
            Self::Single(value) => value.take(),
            Self::Transition(transition) => transition.next().await,
        }
    }

    /// Check if the output spans multiple ticks
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition(_))
    }
}
