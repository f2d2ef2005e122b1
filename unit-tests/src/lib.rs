//! Shared fixtures for the dimmer tests
//!
//! [`VirtualClock`] replaces the embassy ticker with virtual time: every
//! tick moves the clock to the tick's scheduled instant, so tests can assert
//! both the emitted values and when they were emitted, without sleeping.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use myrtio_dimmer::{
    Clock, CommandError, DimConfig, DimOutput, DimProcessor, OutputSink, Status, TickSource,
    Transition,
};

/// Processor driven by virtual time
pub type TestProcessor = DimProcessor<VirtualClock, NoopRawMutex>;

/// Configuration used by most tests: 2 ms ticks, 0..100, quarter steps
pub fn quarter_config() -> DimConfig {
    DimConfig::new(2, 0.0, 100.0, 0.25).unwrap()
}

/// Processor with [`quarter_config`] and its clock
pub fn quarter_processor() -> (TestProcessor, VirtualClock) {
    let clock = VirtualClock::default();
    let processor = TestProcessor::new(clock.clone(), quarter_config()).unwrap();
    (processor, clock)
}

/// Virtual millisecond clock
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<u64>>,
}

impl VirtualClock {
    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now.get()
    }

    /// Move virtual time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for VirtualClock {
    type Ticks = VirtualTicks;

    fn ticks(&self, interval: Duration) -> VirtualTicks {
        let interval_ms = interval.as_millis();
        VirtualTicks {
            now: self.now.clone(),
            interval_ms,
            next_at: self.now.get() + interval_ms,
        }
    }
}

/// Tick source on a fixed virtual schedule
#[derive(Debug)]
pub struct VirtualTicks {
    now: Rc<Cell<u64>>,
    interval_ms: u64,
    next_at: u64,
}

impl TickSource for VirtualTicks {
    async fn next(&mut self) {
        // let concurrently polled futures observe the pending tick
        embassy_futures::yield_now().await;
        if self.now.get() < self.next_at {
            self.now.set(self.next_at);
        }
        self.next_at += self.interval_ms;
    }
}

/// Drain a transition, recording the virtual time of every value
pub fn timed_values(
    transition: &mut Transition<'_, VirtualClock, NoopRawMutex>,
    clock: &VirtualClock,
) -> Vec<(u64, f64)> {
    embassy_futures::block_on(async {
        let mut values = Vec::new();
        while let Some(value) = transition.next().await {
            values.push((clock.now_ms(), value));
        }
        values
    })
}

/// Drain a transition
pub fn values(transition: &mut Transition<'_, VirtualClock, NoopRawMutex>) -> Vec<f64> {
    embassy_futures::block_on(async {
        let mut values = Vec::new();
        while let Some(value) = transition.next().await {
            values.push(value);
        }
        values
    })
}

/// Drain any processor output
pub fn output_values(output: &mut DimOutput<'_, VirtualClock, NoopRawMutex>) -> Vec<f64> {
    embassy_futures::block_on(async {
        let mut values = Vec::new();
        while let Some(value) = output.next().await {
            values.push(value);
        }
        values
    })
}

/// Event observed by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Value(f64),
    Status(Status),
    Complete,
    Fail(CommandError),
}

/// Sink recording everything it receives
///
/// Clones share the same record, so a clone can be kept by the test while
/// the controller owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    pub fn values(&self) -> Vec<f64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Value(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> usize {
        self.count(|event| matches!(event, SinkEvent::Complete))
    }

    pub fn failures(&self) -> Vec<CommandError> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Fail(error) => Some(*error),
                _ => None,
            })
            .collect()
    }

    fn count(&self, f: impl Fn(&SinkEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| f(event)).count()
    }
}

impl OutputSink for RecordingSink {
    fn send(&mut self, value: f64) {
        self.events.borrow_mut().push(SinkEvent::Value(value));
    }

    fn status(&mut self, status: Status) {
        self.events.borrow_mut().push(SinkEvent::Status(status));
    }

    fn complete(&mut self) {
        self.events.borrow_mut().push(SinkEvent::Complete);
    }

    fn fail(&mut self, error: CommandError) {
        self.events.borrow_mut().push(SinkEvent::Fail(error));
    }
}
