//! Operator input sampled once per tick

use serde::{Deserialize, Serialize};
use teleop_core::LogSummary;

/// One gamepad sample, taken fresh at the start of every tick
///
/// `axis_y` is already sign-corrected so that pushing the stick forward is
/// positive. `button4` is sampled for completeness but no policy reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub axis_y: f64,
    pub button1: bool,
    pub button2: bool,
    pub button3: bool,
    pub button4: bool,
}

impl TickInput {
    /// Stick deflection only, all buttons released
    pub fn stick(axis_y: f64) -> Self {
        Self {
            axis_y,
            ..Default::default()
        }
    }

    /// Button `index` (1-4) held, stick centered
    pub fn pressed(index: usize) -> Self {
        let mut input = Self::default();
        match index {
            1 => input.button1 = true,
            2 => input.button2 = true,
            3 => input.button3 = true,
            4 => input.button4 = true,
            _ => {}
        }
        input
    }
}

impl LogSummary for TickInput {
    fn log_summary(&self) -> String {
        format!(
            "y={:.3} b=[{}{}{}{}]",
            self.axis_y,
            self.button1 as u8,
            self.button2 as u8,
            self.button3 as u8,
            self.button4 as u8
        )
    }
}
