//! Collaborator interfaces and their implementations
//!
//! The servo node talks to the outside world only through three traits:
//!
//! - [`InputSource`]: raw axes and buttons of an operator gamepad
//! - [`Actuator`]: a motor controller running its own position loop
//! - [`TelemetrySink`]: where diagnostic lines go
//!
//! Implementations here cover a simulated actuator, a scripted input for
//! demos and tests, a gilrs-backed gamepad (feature `gilrs`) and console /
//! `log` telemetry sinks.

pub mod scripted_input;
pub mod servo_config;
pub mod sim_actuator;
pub mod telemetry_sink;

#[cfg(feature = "gilrs")]
pub mod gamepad;

use crate::messages::{ControlMode, TickInput};
use serde::{Deserialize, Serialize};
use teleop_core::{RuntimeParams, TeleopResult};

pub use scripted_input::{InputFrame, ScriptedInput};
pub use servo_config::ServoConfig;
pub use sim_actuator::SimulatedActuator;
pub use telemetry_sink::{LogTelemetry, StdoutTelemetry};

#[cfg(feature = "gilrs")]
pub use gamepad::GamepadInput;

/// Operator input device, polled once per tick
///
/// Indices follow driver-station numbering: axes from 0, buttons from 1.
/// Unknown indices read as centered / released.
pub trait InputSource {
    /// Refresh the cached sample. Called once at the start of every tick.
    fn poll(&mut self) {}

    /// Axis value in [-1, 1]
    fn axis(&self, index: usize) -> f64;

    fn button(&self, index: usize) -> bool;
}

/// Motor controller running its own closed-loop position control
pub trait Actuator {
    /// Apply sensor, output and gain settings. Called once before the first tick.
    fn configure(&mut self, config: &ServoConfig) -> TeleopResult<()>;

    /// Enter position mode and servo to `target` counts
    fn set_position_target(&mut self, target: f64);

    /// Pull the latest status frame. Called once at the start of every tick.
    fn refresh(&mut self) {}

    /// Sensor position in counts
    fn current_position(&self) -> i32;

    /// Closed-loop error in counts, meaningful in position mode
    fn current_closed_loop_error(&self) -> i32;

    /// Applied output in [-1, 1]
    fn current_output_percent(&self) -> f64;

    fn control_mode(&self) -> ControlMode;

    fn is_in_position_mode(&self) -> bool {
        self.control_mode() == ControlMode::Position
    }
}

/// Destination for formatted telemetry lines
pub trait TelemetrySink {
    fn emit(&mut self, line: &str);
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self) {
        (**self).poll();
    }

    fn axis(&self, index: usize) -> f64 {
        (**self).axis(index)
    }

    fn button(&self, index: usize) -> bool {
        (**self).button(index)
    }
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn configure(&mut self, config: &ServoConfig) -> TeleopResult<()> {
        (**self).configure(config)
    }

    fn set_position_target(&mut self, target: f64) {
        (**self).set_position_target(target);
    }

    fn refresh(&mut self) {
        (**self).refresh();
    }

    fn current_position(&self) -> i32 {
        (**self).current_position()
    }

    fn current_closed_loop_error(&self) -> i32 {
        (**self).current_closed_loop_error()
    }

    fn current_output_percent(&self) -> f64 {
        (**self).current_output_percent()
    }

    fn control_mode(&self) -> ControlMode {
        (**self).control_mode()
    }
}

/// Which gamepad channels feed a [`TickInput`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputMapping {
    pub axis_index: usize,
    /// Negate the axis; gamepads report forward as negative Y
    pub invert_axis: bool,
    /// Driver-station numbers of buttons 1-4
    pub buttons: [usize; 4],
}

impl Default for InputMapping {
    fn default() -> Self {
        Self {
            axis_index: 1,
            invert_axis: true,
            buttons: [1, 2, 3, 4],
        }
    }
}

impl InputMapping {
    /// Read `input.*` keys, defaulting anything missing
    pub fn from_params(params: &RuntimeParams) -> TeleopResult<Self> {
        let d = Self::default();
        Ok(Self {
            axis_index: params.require_or("input.axis_index", d.axis_index)?,
            invert_axis: params.require_or("input.invert_axis", d.invert_axis)?,
            buttons: params.require_or("input.buttons", d.buttons)?,
        })
    }

    /// Take one sample from an already polled source
    pub fn sample<S: InputSource + ?Sized>(&self, source: &S) -> TickInput {
        let raw = source.axis(self.axis_index);
        TickInput {
            axis_y: if self.invert_axis { -raw } else { raw },
            button1: source.button(self.buttons[0]),
            button2: source.button(self.buttons[1]),
            button3: source.button(self.buttons[2]),
            button4: source.button(self.buttons[3]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInput {
        axes: Vec<f64>,
        pressed: Vec<usize>,
    }

    impl InputSource for FixedInput {
        fn axis(&self, index: usize) -> f64 {
            self.axes.get(index).copied().unwrap_or(0.0)
        }

        fn button(&self, index: usize) -> bool {
            self.pressed.contains(&index)
        }
    }

    #[test]
    fn test_default_mapping_inverts_y() {
        let source = FixedInput {
            axes: vec![0.3, -0.5],
            pressed: vec![2, 4],
        };
        let input = InputMapping::default().sample(&source);

        assert_eq!(input.axis_y, 0.5);
        assert!(!input.button1);
        assert!(input.button2);
        assert!(!input.button3);
        assert!(input.button4);
    }

    #[test]
    fn test_custom_mapping() {
        let params = RuntimeParams::from_yaml_str(
            "input.axis_index: 0\ninput.invert_axis: false\ninput.buttons: [5, 6, 7, 8]\n",
        )
        .unwrap();
        let mapping = InputMapping::from_params(&params).unwrap();
        let source = FixedInput {
            axes: vec![0.3, -0.5],
            pressed: vec![7],
        };
        let input = mapping.sample(&source);

        assert_eq!(input.axis_y, 0.3);
        assert!(input.button3);
        assert!(!input.button1);
    }
}
