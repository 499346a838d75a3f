//! Scripted gamepad input
//!
//! Replays a list of frames, each held for a number of ticks, then loops.
//! Scripts can be written in YAML:
//!
//! ```yaml
//! - { ticks: 50, buttons: [1] }
//! - { ticks: 100 }
//! - { ticks: 50, axes: [0.0, -0.5] }
//! ```

use super::InputSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use teleop_core::{TeleopError, TeleopResult};

/// One held gamepad state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// How many polls this frame stays active
    pub ticks: u32,
    /// Raw axis values by index; missing axes read 0
    pub axes: Vec<f64>,
    /// Driver-station numbers of held buttons
    pub buttons: Vec<usize>,
}

impl InputFrame {
    pub fn idle(ticks: u32) -> Self {
        Self {
            ticks,
            ..Default::default()
        }
    }

    pub fn button(ticks: u32, button: usize) -> Self {
        Self {
            ticks,
            buttons: vec![button],
            ..Default::default()
        }
    }

    /// Raw left-stick Y; forward on a gamepad is negative
    pub fn left_y(ticks: u32, raw: f64) -> Self {
        Self {
            ticks,
            axes: vec![0.0, raw],
            ..Default::default()
        }
    }
}

/// Looping playback of [`InputFrame`]s
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    index: usize,
    remaining: u32,
    started: bool,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputFrame>) -> TeleopResult<Self> {
        if frames.is_empty() {
            return Err(TeleopError::InvalidInput("input script has no frames".to_string()));
        }
        if frames.iter().any(|frame| frame.ticks == 0) {
            return Err(TeleopError::InvalidInput(
                "input script frames must last at least one tick".to_string(),
            ));
        }
        Ok(Self {
            frames,
            index: 0,
            remaining: 0,
            started: false,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> TeleopResult<Self> {
        let frames: Vec<InputFrame> = serde_yaml::from_str(yaml)?;
        Self::new(frames)
    }

    pub fn from_file(path: &Path) -> TeleopResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Presets 1 to 3 in turn, each followed by forward and back stick
    pub fn demo() -> Self {
        let mut frames = Vec::new();
        for button in 1..=3 {
            frames.push(InputFrame::button(5, button));
            frames.push(InputFrame::idle(120));
            frames.push(InputFrame::left_y(40, -0.6));
            frames.push(InputFrame::idle(20));
            frames.push(InputFrame::left_y(40, 0.6));
            frames.push(InputFrame::idle(20));
        }
        Self {
            frames,
            index: 0,
            remaining: 0,
            started: false,
        }
    }

    fn current(&self) -> Option<&InputFrame> {
        self.started.then(|| &self.frames[self.index])
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        if !self.started {
            self.started = true;
        } else if self.remaining == 0 {
            self.index = (self.index + 1) % self.frames.len();
        }
        if self.remaining == 0 {
            self.remaining = self.frames[self.index].ticks;
        }
        self.remaining -= 1;
    }

    fn axis(&self, index: usize) -> f64 {
        self.current()
            .and_then(|frame| frame.axes.get(index).copied())
            .unwrap_or(0.0)
    }

    fn button(&self, index: usize) -> bool {
        self.current()
            .map(|frame| frame.buttons.contains(&index))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_hold_and_loop() {
        let mut input =
            ScriptedInput::new(vec![InputFrame::button(2, 1), InputFrame::left_y(1, -0.5)])
                .unwrap();

        let mut seen = Vec::new();
        for _ in 0..6 {
            input.poll();
            seen.push((input.button(1), input.axis(1)));
        }

        assert_eq!(
            seen,
            vec![
                (true, 0.0),
                (true, 0.0),
                (false, -0.5),
                (true, 0.0),
                (true, 0.0),
                (false, -0.5),
            ]
        );
    }

    #[test]
    fn test_unpolled_reads_neutral() {
        let input = ScriptedInput::new(vec![InputFrame::button(1, 3)]).unwrap();
        assert!(!input.button(3));
        assert_eq!(input.axis(1), 0.0);
    }

    #[test]
    fn test_yaml_script() {
        let mut input = ScriptedInput::from_yaml_str(
            "- { ticks: 1, buttons: [2] }\n- { ticks: 1, axes: [0.0, 0.25] }\n",
        )
        .unwrap();

        input.poll();
        assert!(input.button(2));
        input.poll();
        assert_eq!(input.axis(1), 0.25);
    }

    #[test]
    fn test_rejects_empty_and_zero_length() {
        assert!(ScriptedInput::new(Vec::new()).is_err());
        assert!(ScriptedInput::new(vec![InputFrame::idle(0)]).is_err());
    }
}
