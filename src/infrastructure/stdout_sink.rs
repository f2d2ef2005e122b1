use std::io::{self, Write};

use myrtio_dimmer::{CommandError, OutputSink, Status};

/// Writes every emitted value on its own stdout line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub const fn new() -> Self {
        Self
    }
}

impl OutputSink for StdoutSink {
    fn send(&mut self, value: f64) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", value).and_then(|()| stdout.flush()) {
            log::error!("stdout: write failed: {}", e);
        }
    }

    fn status(&mut self, status: Status) {
        match status {
            Status::Dimming(_) => log::info!("status: {}", status.text()),
            Status::Clear => log::debug!("status: cleared"),
        }
    }

    fn complete(&mut self) {
        log::debug!("stdout: interaction complete");
    }

    fn fail(&mut self, error: CommandError) {
        log::error!("stdout: command rejected: {}", error);
    }
}
