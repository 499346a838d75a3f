//! Telemetry snapshots of the servo

use serde::{Deserialize, Serialize};
use std::fmt;
use teleop_core::LogSummary;

/// Closed-loop fields, only reported while the actuator is in position mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedLoopStatus {
    /// Actuator-reported closed-loop error, in counts
    pub error: i32,
    /// Target the arbiter holds after this tick
    pub target: f64,
}

/// One tick's worth of servo diagnostics
///
/// `output_percent` and `position` are read before the tick's command is
/// sent; `closed_loop` is read after it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub output_percent: f64,
    pub position: i32,
    pub closed_loop: Option<ClosedLoopStatus>,
}

impl TelemetryFrame {
    /// Render as a tab-separated driver-station line
    ///
    /// ```text
    /// \tout right: 0.250000\tpos right: 4790\terrNative: 10\ttrg: 4800.000000
    /// ```
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TelemetryFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\tout right: {:.6}\tpos right: {}",
            self.output_percent, self.position
        )?;
        if let Some(status) = &self.closed_loop {
            write!(f, "\terrNative: {}\ttrg: {:.6}", status.error, status.target)?;
        }
        Ok(())
    }
}

impl LogSummary for TelemetryFrame {
    fn log_summary(&self) -> String {
        match &self.closed_loop {
            Some(status) => format!(
                "out={:.3} pos={} err={} trg={:.1}",
                self.output_percent, self.position, status.error, status.target
            ),
            None => format!("out={:.3} pos={}", self.output_percent, self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_loop_line() {
        let frame = TelemetryFrame {
            output_percent: 0.0,
            position: 0,
            closed_loop: None,
        };
        assert_eq!(frame.to_line(), "\tout right: 0.000000\tpos right: 0");
    }

    #[test]
    fn test_position_mode_line() {
        let frame = TelemetryFrame {
            output_percent: -0.25,
            position: 9610,
            closed_loop: Some(ClosedLoopStatus {
                error: -10,
                target: 9600.0,
            }),
        };
        assert_eq!(
            frame.to_line(),
            "\tout right: -0.250000\tpos right: 9610\terrNative: -10\ttrg: 9600.000000"
        );
    }
}
