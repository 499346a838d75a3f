//! # Teleop Library
//!
//! Messages, hardware interfaces and nodes for driving a position-controlled
//! actuator from a gamepad.
//!
//! ## Structure
//!
//! ```text
//! teleop_library/
//! ── messages/       # Per-tick input, setpoints, telemetry frames
//! ── algorithms/     # Position arbitration, tick throttling
//! ── hardware/       # Input / actuator / telemetry traits and backends
//! ── nodes/          # PositionServoNode
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use teleop_library::{PositionServoNode, TickInput};
//! use teleop_library::algorithms::{ArbiterConfig, PositionArbiter};
//!
//! let mut arbiter = PositionArbiter::new(ArbiterConfig::default());
//! let cmd = arbiter.tick(&TickInput::pressed(3), || 0);
//! assert_eq!(cmd.map(|c| c.target), Some(14400.0));
//! ```

pub mod algorithms;
pub mod hardware;
pub mod messages;
pub mod nodes;

// Re-export core traits needed for message types
pub use teleop_core::LogSummary;

// Re-export message types at the crate root for convenience
pub use messages::*;

pub use nodes::PositionServoNode;

#[cfg(feature = "gilrs")]
pub use hardware::GamepadInput;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::LogSummary;

    pub use crate::messages::{
        ClosedLoopStatus, ControlMode, PositionCommand, TelemetryFrame, TickInput,
    };

    pub use crate::algorithms::{ArbiterConfig, PositionArbiter};
    pub use crate::hardware::{
        Actuator, InputMapping, InputSource, ServoConfig, SimulatedActuator, TelemetrySink,
    };

    pub use crate::nodes::PositionServoNode;
}
