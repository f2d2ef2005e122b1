//! Dimmer controller
//!
//! Receives command messages over a channel, runs them on the processor and
//! forwards every emitted value to an [`OutputSink`]. A command arriving
//! while a transition is in flight supersedes it: the new operation is
//! started first, then the old interaction is completed.

use core::fmt::Write;

use embassy_futures::select::{Either, select};
use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::{Channel, Receiver, Sender},
};
use heapless::String;

use crate::{
    clock::Clock,
    command::{CommandError, DimCommandMessage},
    processor::DimProcessor,
    transition::DimOutput,
};

/// Command channel capacity
pub const COMMAND_CHANNEL_SIZE: usize = 4;

/// Type alias for the command channel
pub type CommandChannel<M = CriticalSectionRawMutex> =
    Channel<M, DimCommandMessage, COMMAND_CHANNEL_SIZE>;

/// Type alias for command sender
pub type CommandSender<'a, M = CriticalSectionRawMutex> =
    Sender<'a, M, DimCommandMessage, COMMAND_CHANNEL_SIZE>;

/// Type alias for command receiver
pub type CommandReceiver<'a, M = CriticalSectionRawMutex> =
    Receiver<'a, M, DimCommandMessage, COMMAND_CHANNEL_SIZE>;

/// Status shown while an interaction is running
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    /// A value was just emitted
    Dimming(f64),
    /// No interaction is running
    Clear,
}

/// Status text capacity, enough for any `f64` in scientific notation
pub const STATUS_TEXT_CAPACITY: usize = 40;

impl Status {
    /// Human readable status text, empty when cleared
    ///
    /// Values too wide for plain notation are written as `1e30`.
    pub fn text(&self) -> String<STATUS_TEXT_CAPACITY> {
        let mut text = String::new();
        if let Status::Dimming(value) = self {
            let written = write!(text, "dimming ({})", value).or_else(|_| {
                text.clear();
                write!(text, "dimming ({:e})", value)
            });
            if written.is_err() {
                text.clear();
            }
        }
        text
    }
}

/// Downstream consumer of dimmer output
pub trait OutputSink {
    /// Forward one emitted value
    fn send(&mut self, value: f64);
    /// Report the current status
    fn status(&mut self, status: Status);
    /// The interaction ended (target reached, single value sent or
    /// superseded)
    fn complete(&mut self);
    /// The command was rejected
    fn fail(&mut self, error: CommandError);
}

/// Dispatches commands onto a processor
pub struct DimmerController<'a, C: Clock, S: OutputSink, M: RawMutex = CriticalSectionRawMutex> {
    processor: &'a DimProcessor<C, M>,
    commands: CommandReceiver<'a, M>,
    sink: S,
}

impl<'a, C: Clock, S: OutputSink, M: RawMutex> DimmerController<'a, C, S, M> {
    pub fn new(processor: &'a DimProcessor<C, M>, commands: CommandReceiver<'a, M>, sink: S) -> Self {
        Self {
            processor,
            commands,
            sink,
        }
    }

    /// Get the output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run a single command to completion, ignoring the channel
    pub async fn handle(&mut self, message: &DimCommandMessage) {
        if let Some(mut output) = self.dispatch(message) {
            while let Some(value) = output.next().await {
                self.emit(value);
            }
            self.finish();
        }
    }

    /// Run the dispatch loop indefinitely
    pub async fn run(&mut self) -> ! {
        let mut current: Option<DimOutput<'a, C, M>> = None;
        loop {
            let Some(output) = current.as_mut() else {
                let message = self.commands.receive().await;
                current = self.dispatch(&message);
                continue;
            };

            let event = select(output.next(), self.commands.receive()).await;
            match event {
                Either::First(Some(value)) => self.emit(value),
                Either::First(None) => {
                    self.finish();
                    current = None;
                }
                Either::Second(message) => {
                    // a rejected command leaves the running interaction alone
                    if let Some(next) = self.dispatch(&message) {
                        self.finish();
                        current = Some(next);
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, message: &DimCommandMessage) -> Option<DimOutput<'a, C, M>> {
        let processor = self.processor;
        let result = message
            .to_operation()
            .and_then(|operation| {
                log::debug!("dimmer: dispatching {}", operation.name());
                processor.execute(operation).map_err(CommandError::from)
            });
        match result {
            Ok(output) => Some(output),
            Err(err) => {
                log::warn!("dimmer: rejected {} command: {}", message.command.as_str(), err);
                self.sink.fail(err);
                None
            }
        }
    }

    fn emit(&mut self, value: f64) {
        self.sink.status(Status::Dimming(value));
        self.sink.send(value);
    }

    fn finish(&mut self) {
        self.sink.status(Status::Clear);
        self.sink.complete();
    }
}
