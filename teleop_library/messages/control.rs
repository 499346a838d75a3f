//! Control message types for the position servo

use serde::{Deserialize, Serialize};
use teleop_core::LogSummary;

/// Closed-loop position setpoint, in native feedback counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionCommand {
    pub target: f64,
}

impl PositionCommand {
    pub fn new(target: f64) -> Self {
        Self { target }
    }

    /// Check if the target is a usable number
    pub fn is_valid(&self) -> bool {
        self.target.is_finite()
    }
}

impl LogSummary for PositionCommand {
    fn log_summary(&self) -> String {
        format!("target={:.1}", self.target)
    }
}

/// Output mode reported by the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Open-loop duty cycle; the power-on mode
    #[default]
    PercentOutput,
    /// Closed-loop position servo
    Position,
}
