//! Teleop nodes
//!
//! Nodes plug into a [`teleop_core::Scheduler`] and own their hardware
//! collaborators.
//!
//! - `PositionServoNode` - gamepad presets and stick nudging for a position servo
//!
//! # Usage
//!
//! ```rust
//! use teleop_core::Scheduler;
//! use teleop_library::hardware::{LogTelemetry, ScriptedInput, SimulatedActuator};
//! use teleop_library::nodes::PositionServoNode;
//!
//! let node = PositionServoNode::new(
//!     ScriptedInput::demo(),
//!     SimulatedActuator::new("right", 120.0),
//!     LogTelemetry::default(),
//! );
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(node), 0, Some(false));
//! scheduler.tick_once();
//! ```

pub mod position_servo;

pub use position_servo::PositionServoNode;
