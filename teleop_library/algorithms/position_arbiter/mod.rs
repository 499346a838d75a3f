//! Position-target arbitration for a teleoperated position servo
//!
//! Decides, once per tick, which position setpoint (if any) to send to a
//! closed-loop actuator, from a gamepad sample and the actuator's position.
//!
//! # Policy
//!
//! Checked in order, only the first match fires:
//!
//! 1. Button 1 rising edge: jump to preset 1
//! 2. Button 2 rising edge: jump to preset 2
//! 3. Button 3 rising edge: jump to preset 3
//! 4. Stick outside the deadband: nudge the target by `axis_y * scale_counts`
//!
//! The stick nudge is anchored to the last target while the actuator is
//! within `window_counts` of it, and to the actuator's actual position
//! otherwise, so a lagging mechanism never accumulates a runaway setpoint.
//!
//! # Example
//!
//! ```rust
//! use teleop_library::algorithms::position_arbiter::{ArbiterConfig, PositionArbiter};
//! use teleop_library::TickInput;
//!
//! let mut arbiter = PositionArbiter::new(ArbiterConfig::default());
//!
//! let cmd = arbiter.tick(&TickInput::pressed(2), || 0);
//! assert_eq!(cmd.map(|c| c.target), Some(9600.0));
//!
//! let cmd = arbiter.tick(&TickInput::stick(0.5), || 9600);
//! assert_eq!(cmd.map(|c| c.target), Some(9675.0));
//! ```

use crate::messages::{PositionCommand, TickInput};
use serde::{Deserialize, Serialize};
use teleop_core::{RuntimeParams, TeleopError, TeleopResult};

/// Tuning for the arbiter, in native feedback counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Encoder resolution at the motor shaft
    pub encoder_counts_per_rev: f64,
    /// Motor-to-mechanism reduction
    pub gear_ratio: f64,
    /// Mechanism rotations for buttons 1, 2 and 3
    pub preset_rotations: [f64; 3],
    /// Target change for a full stick deflection in one tick
    pub scale_counts: f64,
    /// Half-width of the "caught up" window around the target
    pub window_counts: f64,
    /// Stick magnitudes at or below this are treated as centered
    pub deadband: f64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            encoder_counts_per_rev: 80.0,
            gear_ratio: 12.0,
            preset_rotations: [5.0, 10.0, 15.0],
            scale_counts: 150.0,
            window_counts: 50.0,
            deadband: 0.01,
        }
    }
}

impl ArbiterConfig {
    /// Read `arbiter.*` keys, defaulting anything missing
    pub fn from_params(params: &RuntimeParams) -> TeleopResult<Self> {
        let d = Self::default();
        let config = Self {
            encoder_counts_per_rev: params
                .require_or("arbiter.encoder_counts_per_rev", d.encoder_counts_per_rev)?,
            gear_ratio: params.require_or("arbiter.gear_ratio", d.gear_ratio)?,
            preset_rotations: params.require_or("arbiter.preset_rotations", d.preset_rotations)?,
            scale_counts: params.require_or("arbiter.scale_counts", d.scale_counts)?,
            window_counts: params.require_or("arbiter.window_counts", d.window_counts)?,
            deadband: params.require_or("arbiter.deadband", d.deadband)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TeleopResult<()> {
        let finite = [
            self.encoder_counts_per_rev,
            self.gear_ratio,
            self.scale_counts,
            self.window_counts,
            self.deadband,
        ]
        .iter()
        .chain(self.preset_rotations.iter())
        .all(|v| v.is_finite());

        if !finite {
            return Err(TeleopError::config("arbiter values must be finite"));
        }
        if self.encoder_counts_per_rev <= 0.0 || self.gear_ratio <= 0.0 {
            return Err(TeleopError::config(
                "arbiter encoder resolution and gear ratio must be positive",
            ));
        }
        if self.window_counts < 0.0 || self.deadband < 0.0 {
            return Err(TeleopError::config(
                "arbiter window and deadband must not be negative",
            ));
        }
        Ok(())
    }

    /// Counts per mechanism rotation
    pub fn counts_per_rotation(&self) -> f64 {
        self.encoder_counts_per_rev * self.gear_ratio
    }

    /// Preset targets for buttons 1, 2 and 3, in counts
    pub fn preset_targets(&self) -> [f64; 3] {
        let cpr = self.counts_per_rotation();
        self.preset_rotations.map(|rotations| rotations * cpr)
    }
}

/// Everything the arbiter carries from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArbiterState {
    /// Last commanded target, in counts
    pub target_position: f64,
    pub prev_button1: bool,
    pub prev_button2: bool,
    pub prev_button3: bool,
}

/// Edge-triggered preset and stick arbitration
#[derive(Debug, Clone)]
pub struct PositionArbiter {
    config: ArbiterConfig,
    presets: [f64; 3],
    state: ArbiterState,
}

impl PositionArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self::with_state(config, ArbiterState::default())
    }

    /// Start from a known state instead of all-zero
    pub fn with_state(config: ArbiterConfig, state: ArbiterState) -> Self {
        let presets = config.preset_targets();
        Self {
            config,
            presets,
            state,
        }
    }

    /// Run one tick of the policy.
    ///
    /// `current_position` is only called when the stick branch needs it.
    /// Returns the command to send, if any. Never fails.
    pub fn tick<F>(&mut self, input: &TickInput, current_position: F) -> Option<PositionCommand>
    where
        F: FnOnce() -> i32,
    {
        let state = self.state;

        let command = if input.button1 && !state.prev_button1 {
            Some(self.jump_to(self.presets[0]))
        } else if input.button2 && !state.prev_button2 {
            Some(self.jump_to(self.presets[1]))
        } else if input.button3 && !state.prev_button3 {
            Some(self.jump_to(self.presets[2]))
        } else {
            self.nudge(input.axis_y, current_position)
        };

        // Raw values, whichever branch fired
        self.state.prev_button1 = input.button1;
        self.state.prev_button2 = input.button2;
        self.state.prev_button3 = input.button3;

        command
    }

    fn jump_to(&mut self, target: f64) -> PositionCommand {
        self.state.target_position = target;
        PositionCommand::new(target)
    }

    fn nudge<F>(&mut self, axis_y: f64, current_position: F) -> Option<PositionCommand>
    where
        F: FnOnce() -> i32,
    {
        if axis_y.abs() <= self.config.deadband {
            return None;
        }

        // Widened, not truncated: the target keeps its fractional counts
        let current = f64::from(current_position());
        let target = self.state.target_position;
        let window = self.config.window_counts;

        let anchor = if target - window > current || current > target + window {
            current
        } else {
            target
        };

        // A non-finite axis leaves the target where it was
        let command = PositionCommand::new(axis_y * self.config.scale_counts + anchor);
        if !command.is_valid() {
            return None;
        }
        self.state.target_position = command.target;
        Some(command)
    }

    pub fn state(&self) -> &ArbiterState {
        &self.state
    }

    pub fn target_position(&self) -> f64 {
        self.state.target_position
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arbiter_at(target: f64) -> PositionArbiter {
        PositionArbiter::with_state(
            ArbiterConfig::default(),
            ArbiterState {
                target_position: target,
                ..Default::default()
            },
        )
    }

    fn input(axis_y: f64, b1: bool, b2: bool, b3: bool) -> TickInput {
        TickInput {
            axis_y,
            button1: b1,
            button2: b2,
            button3: b3,
            button4: false,
        }
    }

    #[test]
    fn test_default_presets() {
        assert_eq!(
            ArbiterConfig::default().preset_targets(),
            [4800.0, 9600.0, 14400.0]
        );
    }

    #[test]
    fn test_button1_rising_edge_ignores_stick() {
        let mut arbiter = arbiter_at(123.0);
        let cmd = arbiter.tick(&input(0.9, true, false, false), || 0);

        assert_eq!(cmd, Some(PositionCommand::new(4800.0)));
        assert_eq!(arbiter.target_position(), 4800.0);
    }

    #[test]
    fn test_held_button_fires_once() {
        let mut arbiter = arbiter_at(0.0);
        assert!(arbiter.tick(&TickInput::pressed(3), || 0).is_some());
        assert_eq!(arbiter.tick(&TickInput::pressed(3), || 0), None);
        assert_eq!(arbiter.target_position(), 14400.0);
    }

    #[test]
    fn test_held_button_lets_stick_through() {
        let mut arbiter = arbiter_at(0.0);
        arbiter.tick(&TickInput::pressed(1), || 0);

        // still held, so no edge: the stick branch runs
        let cmd = arbiter.tick(&input(1.0, true, false, false), || 4800);
        assert_eq!(cmd, Some(PositionCommand::new(4950.0)));
    }

    #[test]
    fn test_preset_priority() {
        let mut arbiter = arbiter_at(0.0);
        let cmd = arbiter.tick(&input(0.0, true, true, true), || 0);
        assert_eq!(cmd.map(|c| c.target), Some(4800.0));

        // all three flags were latched, so releasing and pressing 2 fires 2
        arbiter.tick(&input(0.0, false, false, false), || 0);
        let cmd = arbiter.tick(&input(0.0, false, true, false), || 0);
        assert_eq!(cmd.map(|c| c.target), Some(9600.0));
    }

    #[test]
    fn test_lower_priority_edge_is_lost() {
        let mut arbiter = arbiter_at(0.0);
        arbiter.tick(&input(0.0, true, true, false), || 0);

        // button2 stays held: its edge was consumed on the tick button1 won
        let cmd = arbiter.tick(&input(0.0, false, true, false), || 0);
        assert_eq!(cmd, None);
        assert_eq!(arbiter.target_position(), 4800.0);
    }

    #[test]
    fn test_button4_is_ignored() {
        let mut arbiter = arbiter_at(500.0);
        let cmd = arbiter.tick(&TickInput::pressed(4), || 0);

        assert_eq!(cmd, None);
        assert_eq!(arbiter.target_position(), 500.0);
    }

    #[test]
    fn test_deadband() {
        for axis in [0.0, 0.005, -0.0099, 0.01, -0.01] {
            let mut arbiter = arbiter_at(1000.0);
            let cmd = arbiter.tick(&TickInput::stick(axis), || panic!("position not needed"));
            assert_eq!(cmd, None, "axis {}", axis);
            assert_eq!(arbiter.target_position(), 1000.0);
        }
    }

    #[test]
    fn test_reanchor_below_window() {
        let mut arbiter = arbiter_at(1000.0);
        let cmd = arbiter.tick(&TickInput::stick(0.2), || 949).unwrap();
        assert_relative_eq!(cmd.target, 0.2 * 150.0 + 949.0);
    }

    #[test]
    fn test_reanchor_above_window() {
        let mut arbiter = arbiter_at(1000.0);
        let cmd = arbiter.tick(&TickInput::stick(-0.4), || 1051).unwrap();
        assert_relative_eq!(cmd.target, -0.4 * 150.0 + 1051.0);
    }

    #[test]
    fn test_window_edges_accumulate() {
        for current in [950, 1000, 1050] {
            let mut arbiter = arbiter_at(1000.0);
            let cmd = arbiter.tick(&TickInput::stick(0.2), || current).unwrap();
            assert_relative_eq!(cmd.target, 0.2 * 150.0 + 1000.0);
        }
    }

    #[test]
    fn test_fractional_target_not_truncated() {
        // 999.5 - 50 = 949.5 > 949: outside, while truncating to 999 would say inside
        let mut arbiter = arbiter_at(999.5);
        let cmd = arbiter.tick(&TickInput::stick(0.1), || 949).unwrap();
        assert_relative_eq!(cmd.target, 0.1 * 150.0 + 949.0);
    }

    #[test]
    fn test_stick_is_not_clamped() {
        let mut arbiter = arbiter_at(0.0);
        let cmd = arbiter.tick(&TickInput::stick(-3.0), || 0).unwrap();
        assert_relative_eq!(cmd.target, -450.0);
    }

    #[test]
    fn test_non_finite_stick_keeps_target() {
        let mut arbiter = arbiter_at(1000.0);
        assert!(arbiter.tick(&TickInput::stick(f64::NAN), || 1000).is_none());
        assert!(arbiter.tick(&TickInput::stick(f64::INFINITY), || 1000).is_none());
        assert_eq!(arbiter.target_position(), 1000.0);

        let cmd = arbiter.tick(&TickInput::stick(0.5), || 1000).unwrap();
        assert_relative_eq!(cmd.target, 1075.0);
    }

    #[test]
    fn test_idle_ticks_keep_state() {
        let mut arbiter = arbiter_at(2000.0);
        arbiter.tick(&TickInput::default(), || 0);
        let before = *arbiter.state();

        arbiter.tick(&TickInput::default(), || 0);
        arbiter.tick(&TickInput::default(), || 0);
        assert_eq!(*arbiter.state(), before);
    }

    #[test]
    fn test_preset_then_stick() {
        let mut arbiter = PositionArbiter::new(ArbiterConfig::default());

        let cmd = arbiter.tick(&TickInput::pressed(2), || 0);
        assert_eq!(cmd.map(|c| c.target), Some(9600.0));

        let cmd = arbiter.tick(&TickInput::stick(0.5), || 9600);
        assert_eq!(cmd.map(|c| c.target), Some(9675.0));
        assert!(!arbiter.state().prev_button2);
    }

    #[test]
    fn test_config_from_params() {
        let params = RuntimeParams::from_yaml_str(
            "arbiter.scale_counts: 300\narbiter.preset_rotations: [1, 2, 3]\n",
        )
        .unwrap();
        let config = ArbiterConfig::from_params(&params).unwrap();

        assert_eq!(config.scale_counts, 300.0);
        assert_eq!(config.window_counts, 50.0);
        assert_eq!(config.preset_targets(), [960.0, 1920.0, 2880.0]);
    }

    #[test]
    fn test_config_rejects_negative_window() {
        let params = RuntimeParams::from_yaml_str("arbiter.window_counts: -1\n").unwrap();
        assert!(matches!(
            ArbiterConfig::from_params(&params),
            Err(TeleopError::Config(_))
        ));
    }
}
