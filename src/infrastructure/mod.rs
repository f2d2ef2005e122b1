pub mod stdin_reader;
pub mod stdout_sink;

pub use stdin_reader::spawn_stdin_reader;
pub use stdout_sink::StdoutSink;
