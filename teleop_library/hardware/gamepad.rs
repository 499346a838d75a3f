//! Gamepad input through gilrs
//!
//! Presents a gilrs gamepad with driver-station numbering so the default
//! [`InputMapping`](super::InputMapping) works unchanged: axis 1 is the
//! left stick Y with forward reading negative, buttons count from 1 in
//! DirectInput order (X, A, B, Y, LB, RB, LT, RT, Back, Start, LS, RS).

use super::InputSource;
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use teleop_core::{TeleopError, TeleopResult};

pub struct GamepadInput {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

impl GamepadInput {
    /// Use the first connected gamepad; later events may switch to another
    pub fn new() -> TeleopResult<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| TeleopError::device_setup("gamepad", format!("gilrs init failed: {}", e)))?;
        let active = gilrs.gamepads().next().map(|(id, _)| id);

        match active {
            Some(id) => log::info!("Using gamepad '{}'", gilrs.gamepad(id).name()),
            None => log::warn!("No gamepad connected; input reads neutral until one appears"),
        }

        Ok(Self { gilrs, active })
    }
}

impl InputSource for GamepadInput {
    fn poll(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    if self.active.is_none() {
                        log::info!("Gamepad {:?} connected", id);
                        self.active = Some(id);
                    }
                }
                EventType::Disconnected => {
                    if self.active == Some(id) {
                        log::warn!("Gamepad {:?} disconnected", id);
                        self.active = self.gilrs.gamepads().next().map(|(id, _)| id);
                    }
                }
                _ => {}
            }
        }
    }

    fn axis(&self, index: usize) -> f64 {
        let (Some(id), Some((axis, sign))) = (self.active, id_to_axis(index)) else {
            return 0.0;
        };
        let value = self.gilrs.gamepad(id).value(axis);
        f64::from(value) * sign
    }

    fn button(&self, index: usize) -> bool {
        match (self.active, id_to_button(index)) {
            (Some(id), Some(button)) => self.gilrs.gamepad(id).is_pressed(button),
            _ => false,
        }
    }
}

/// gilrs reports stick Y up-positive; driver stations report it down-positive
fn id_to_axis(index: usize) -> Option<(Axis, f64)> {
    match index {
        0 => Some((Axis::LeftStickX, 1.0)),
        1 => Some((Axis::LeftStickY, -1.0)),
        2 => Some((Axis::LeftZ, 1.0)),
        3 => Some((Axis::RightZ, 1.0)),
        4 => Some((Axis::RightStickX, 1.0)),
        5 => Some((Axis::RightStickY, -1.0)),
        _ => None,
    }
}

fn id_to_button(index: usize) -> Option<Button> {
    match index {
        1 => Some(Button::West),
        2 => Some(Button::South),
        3 => Some(Button::East),
        4 => Some(Button::North),
        5 => Some(Button::LeftTrigger),
        6 => Some(Button::RightTrigger),
        7 => Some(Button::LeftTrigger2),
        8 => Some(Button::RightTrigger2),
        9 => Some(Button::Select),
        10 => Some(Button::Start),
        11 => Some(Button::LeftThumb),
        12 => Some(Button::RightThumb),
        _ => None,
    }
}
