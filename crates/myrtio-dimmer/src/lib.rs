#![no_std]

//! Dimmer - time driven value transitions
//!
//! Architecture layers:
//! - `config` - Dimmer configuration and partial updates
//! - `easing` - Easing curves and output rounding
//! - `clock` - Tick source abstraction ([`Clock`] trait + embassy ticker)
//! - `operation` - Validated operations accepted by the processor
//! - `error` - Configuration errors
//! - `processor` - Transition state machine and supersession
//! - `transition` - Lazily evaluated per-tick value sequences
//! - `command` - Wire level command payloads and validation
//! - `controller` - Command dispatch loop driving an output sink
//!
//! The processor is generic over `Clock`, allowing real and virtual time.

pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod operation;
pub mod processor;
pub mod transition;

// Clock exports
pub use clock::{Clock, SystemClock, TickSource};

// Command exports
pub use command::{
    CommandError, DimCommand, DimCommandMessage, DimConfigUpdateDto, parse_operation,
    parse_payload,
};

// Config exports
pub use config::{DimConfig, DimConfigUpdate};

// Controller exports
pub use controller::{
    CommandChannel, CommandReceiver, CommandSender, DimmerController, OutputSink, Status,
};

pub use easing::EaseFn;
pub use error::ConfigError;
pub use operation::Operation;

// Processor exports
pub use processor::{CancellationToken, DimProcessor, EngineState};

// Transition exports
pub use transition::{DimOutput, Transition, TransitionEnd};
