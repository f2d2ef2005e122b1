use std::io::{self, BufRead};
use std::thread;

use myrtio_dimmer::{CommandSender, parse_payload};

/// Spawn a thread forwarding every stdin line as a command
///
/// Malformed lines are logged and skipped. The thread ends with stdin.
pub fn spawn_stdin_reader(commands: CommandSender<'static>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("stdin: read failed: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_payload(&line) {
                    Ok(message) => embassy_futures::block_on(commands.send(message)),
                    Err(e) => log::warn!("stdin: skipping line: {}", e),
                }
            }
            log::info!("stdin: closed");
        })
}
