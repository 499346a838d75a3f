//! Motor-controller bring-up settings
//!
//! Values are handed to the controller once at startup; the closed loop
//! itself runs inside the device.

use serde::{Deserialize, Serialize};
use teleop_core::{RuntimeParams, TeleopError, TeleopResult};

/// Sensor, output and slot-0 gain settings for a position servo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Controller bus ID
    pub device_id: u8,
    /// Closed-loop slot the gains and sensor are bound to
    pub pid_loop_index: u8,
    /// Per-call configuration timeout
    pub timeout_ms: u32,

    /// Sensor position written at startup
    pub initial_sensor_position: i32,
    /// Flip the sensor so forward output counts up (hardware only; the
    /// simulated actuator is always in phase)
    pub sensor_phase: bool,
    /// Flip the motor output direction
    pub inverted: bool,

    pub nominal_output_forward: f64,
    pub nominal_output_reverse: f64,
    pub peak_output_forward: f64,
    pub peak_output_reverse: f64,

    pub kf: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Error band (counts) inside which the integral accumulates
    pub integral_zone: i32,

    /// Output fraction treated as neutral
    pub neutral_deadband: f64,
    /// Seconds from neutral to full output in closed loop
    pub closed_loop_ramp_s: f64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            device_id: 2,
            pid_loop_index: 0,
            timeout_ms: 10,
            initial_sensor_position: 0,
            sensor_phase: false,
            inverted: false,
            nominal_output_forward: 0.0,
            nominal_output_reverse: 0.0,
            peak_output_forward: 1.0,
            peak_output_reverse: -1.0,
            kf: 0.0,
            kp: 20.0,
            ki: 0.001,
            kd: 200.0,
            integral_zone: 50,
            neutral_deadband: 0.0,
            closed_loop_ramp_s: 0.01,
        }
    }
}

impl ServoConfig {
    /// Read `servo.*` keys, defaulting anything missing
    pub fn from_params(params: &RuntimeParams) -> TeleopResult<Self> {
        let d = Self::default();
        let config = Self {
            device_id: params.require_or("servo.device_id", d.device_id)?,
            pid_loop_index: params.require_or("servo.pid_loop_index", d.pid_loop_index)?,
            timeout_ms: params.require_or("servo.timeout_ms", d.timeout_ms)?,
            initial_sensor_position: params
                .require_or("servo.initial_sensor_position", d.initial_sensor_position)?,
            sensor_phase: params.require_or("servo.sensor_phase", d.sensor_phase)?,
            inverted: params.require_or("servo.inverted", d.inverted)?,
            nominal_output_forward: params
                .require_or("servo.nominal_output_forward", d.nominal_output_forward)?,
            nominal_output_reverse: params
                .require_or("servo.nominal_output_reverse", d.nominal_output_reverse)?,
            peak_output_forward: params.require_or("servo.peak_output_forward", d.peak_output_forward)?,
            peak_output_reverse: params.require_or("servo.peak_output_reverse", d.peak_output_reverse)?,
            kf: params.require_or("servo.kf", d.kf)?,
            kp: params.require_or("servo.kp", d.kp)?,
            ki: params.require_or("servo.ki", d.ki)?,
            kd: params.require_or("servo.kd", d.kd)?,
            integral_zone: params.require_or("servo.integral_zone", d.integral_zone)?,
            neutral_deadband: params.require_or("servo.neutral_deadband", d.neutral_deadband)?,
            closed_loop_ramp_s: params.require_or("servo.closed_loop_ramp_s", d.closed_loop_ramp_s)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no controller would accept
    pub fn validate(&self) -> TeleopResult<()> {
        let values = [
            self.nominal_output_forward,
            self.nominal_output_reverse,
            self.peak_output_forward,
            self.peak_output_reverse,
            self.kf,
            self.kp,
            self.ki,
            self.kd,
            self.neutral_deadband,
            self.closed_loop_ramp_s,
        ];
        if !values.iter().all(|v| v.is_finite()) {
            return Err(TeleopError::config("servo settings must be finite"));
        }
        if !(0.0..=1.0).contains(&self.peak_output_forward)
            || !(-1.0..=0.0).contains(&self.peak_output_reverse)
        {
            return Err(TeleopError::config(
                "servo peak outputs must lie in [0, 1] forward and [-1, 0] reverse",
            ));
        }
        if self.nominal_output_forward > self.peak_output_forward
            || self.nominal_output_reverse < self.peak_output_reverse
        {
            return Err(TeleopError::config("servo nominal output exceeds peak output"));
        }
        if self.kp < 0.0 || self.ki < 0.0 || self.kd < 0.0 || self.integral_zone < 0 {
            return Err(TeleopError::config("servo gains must not be negative"));
        }
        if !(0.0..=0.25).contains(&self.neutral_deadband) {
            return Err(TeleopError::config("servo neutral deadband must lie in [0, 0.25]"));
        }
        if self.closed_loop_ramp_s < 0.0 {
            return Err(TeleopError::config("servo closed-loop ramp must not be negative"));
        }
        Ok(())
    }
}
