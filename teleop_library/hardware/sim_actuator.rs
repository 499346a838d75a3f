//! Simulated position-servo actuator
//!
//! Stands in for a motor controller when no hardware is attached. The
//! mechanism is modeled as a slew-limited follower: each refresh it moves
//! toward the target by at most `max_counts_per_tick` scaled by the peak
//! output. Good enough to watch the arbiter and telemetry behave; not a
//! model of any real drive train.
//!
//! The simulated sensor is always in phase with the output, so
//! `ServoConfig::sensor_phase` is accepted and validated but has no effect
//! here. `inverted` flips the reported output sign.

use super::{Actuator, ServoConfig};
use crate::messages::ControlMode;
use teleop_core::{TeleopError, TeleopResult};

pub struct SimulatedActuator {
    name: String,
    config: ServoConfig,
    configured: bool,
    mode: ControlMode,
    position: f64,
    target: f64,
    output_percent: f64,
    max_counts_per_tick: f64,
}

impl SimulatedActuator {
    /// `max_counts_per_tick` is the travel per tick at full output.
    /// A non-finite speed leaves the mechanism stationary.
    pub fn new(name: &str, max_counts_per_tick: f64) -> Self {
        let max_counts_per_tick = if max_counts_per_tick.is_finite() {
            max_counts_per_tick.abs()
        } else {
            log::warn!(
                "{}: ignoring non-finite speed {}, mechanism will not move",
                name,
                max_counts_per_tick
            );
            0.0
        };

        Self {
            name: name.to_string(),
            config: ServoConfig::default(),
            configured: false,
            mode: ControlMode::PercentOutput,
            position: 0.0,
            target: 0.0,
            output_percent: 0.0,
            max_counts_per_tick,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Advance the mechanism by one tick
    pub fn step(&mut self) {
        if self.mode != ControlMode::Position || self.max_counts_per_tick == 0.0 {
            self.output_percent = 0.0;
            return;
        }

        let error = self.target - self.position;
        let mut output = (error / self.max_counts_per_tick)
            .clamp(self.config.peak_output_reverse, self.config.peak_output_forward);

        if output.abs() < self.config.neutral_deadband {
            output = 0.0;
        } else if output > 0.0 {
            output = output.max(self.config.nominal_output_forward);
        } else if output < 0.0 {
            output = output.min(self.config.nominal_output_reverse);
        }

        let travel = (output * self.max_counts_per_tick).clamp(-error.abs(), error.abs());
        self.position += travel;
        self.output_percent = if self.config.inverted { -output } else { output };
    }
}

impl Actuator for SimulatedActuator {
    fn configure(&mut self, config: &ServoConfig) -> TeleopResult<()> {
        config
            .validate()
            .map_err(|e| TeleopError::device_setup(&self.name, e.to_string()))?;

        self.config = config.clone();
        self.position = f64::from(config.initial_sensor_position);
        self.target = self.position;
        self.mode = ControlMode::PercentOutput;
        self.output_percent = 0.0;
        self.configured = true;
        log::debug!(
            "{}: configured (kP={} kI={} kD={} izone={})",
            self.name,
            config.kp,
            config.ki,
            config.kd,
            config.integral_zone
        );
        Ok(())
    }

    fn set_position_target(&mut self, target: f64) {
        if !target.is_finite() {
            log::warn!("{}: ignoring non-finite target {}", self.name, target);
            return;
        }
        self.mode = ControlMode::Position;
        self.target = target;
    }

    fn refresh(&mut self) {
        self.step();
    }

    fn current_position(&self) -> i32 {
        self.position.round() as i32
    }

    fn current_closed_loop_error(&self) -> i32 {
        match self.mode {
            ControlMode::Position => (self.target - self.position).round() as i32,
            _ => 0,
        }
    }

    fn current_output_percent(&self) -> f64 {
        self.output_percent
    }

    fn control_mode(&self) -> ControlMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_starts_open_loop() {
        let actuator = SimulatedActuator::new("talon", 100.0);
        assert_eq!(actuator.control_mode(), ControlMode::PercentOutput);
        assert!(!actuator.is_in_position_mode());
        assert_eq!(actuator.current_closed_loop_error(), 0);
    }

    #[test]
    fn test_configure_sets_sensor_position() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        let config = ServoConfig {
            initial_sensor_position: 250,
            ..Default::default()
        };
        actuator.configure(&config).unwrap();

        assert!(actuator.is_configured());
        assert_eq!(actuator.current_position(), 250);
    }

    #[test]
    fn test_configure_rejects_bad_settings() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        let config = ServoConfig {
            peak_output_forward: 2.0,
            ..Default::default()
        };
        let err = actuator.configure(&config).unwrap_err();
        assert!(matches!(err, TeleopError::DeviceSetup { .. }));
        assert!(!actuator.is_configured());
    }

    #[test]
    fn test_slews_toward_target() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        actuator.configure(&ServoConfig::default()).unwrap();
        actuator.set_position_target(250.0);

        actuator.refresh();
        assert_eq!(actuator.current_position(), 100);
        assert_relative_eq!(actuator.current_output_percent(), 1.0);
        assert_eq!(actuator.current_closed_loop_error(), 150);

        actuator.refresh();
        actuator.refresh();
        assert_eq!(actuator.current_position(), 250);
        assert_eq!(actuator.current_closed_loop_error(), 0);
    }

    #[test]
    fn test_peak_output_limits_speed() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        let config = ServoConfig {
            peak_output_reverse: -0.5,
            ..Default::default()
        };
        actuator.configure(&config).unwrap();
        actuator.set_position_target(-1000.0);

        actuator.refresh();
        assert_eq!(actuator.current_position(), -50);
        assert_relative_eq!(actuator.current_output_percent(), -0.5);
    }

    #[test]
    fn test_non_finite_speed_stays_put() {
        let mut actuator = SimulatedActuator::new("talon", f64::INFINITY);
        actuator.configure(&ServoConfig::default()).unwrap();
        actuator.set_position_target(100.0);

        actuator.refresh();
        actuator.refresh();
        assert_eq!(actuator.current_position(), 0);
        assert_eq!(actuator.current_output_percent(), 0.0);
        assert_eq!(actuator.current_closed_loop_error(), 100);
    }

    #[test]
    fn test_non_finite_target_ignored() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        actuator.configure(&ServoConfig::default()).unwrap();
        actuator.set_position_target(f64::NAN);

        actuator.refresh();
        assert!(!actuator.is_in_position_mode());
        assert_eq!(actuator.current_position(), 0);
    }

    #[test]
    fn test_sensor_phase_does_not_change_motion() {
        let mut actuator = SimulatedActuator::new("talon", 100.0);
        let config = ServoConfig {
            sensor_phase: true,
            ..Default::default()
        };
        actuator.configure(&config).unwrap();
        actuator.set_position_target(150.0);

        actuator.refresh();
        assert_eq!(actuator.current_position(), 100);
    }
}
