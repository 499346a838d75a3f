//! Telemetry sinks

use super::TelemetrySink;
use std::io::Write;

/// Prints each line to stdout, like a driver-station console
#[derive(Debug, Default)]
pub struct StdoutTelemetry;

impl TelemetrySink for StdoutTelemetry {
    fn emit(&mut self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", line);
        let _ = handle.flush();
    }
}

/// Forwards each line to the `log` facade at info level
#[derive(Debug)]
pub struct LogTelemetry {
    target: String,
}

impl LogTelemetry {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl Default for LogTelemetry {
    fn default() -> Self {
        Self::new("telemetry")
    }
}

impl TelemetrySink for LogTelemetry {
    fn emit(&mut self, line: &str) {
        log::info!(target: &self.target, "{}", line.trim_start());
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn emit(&mut self, line: &str) {
        (**self).emit(line);
    }
}
