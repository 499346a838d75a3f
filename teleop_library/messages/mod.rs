//! Message types exchanged between the servo node and its collaborators
//!
//! - Input: one sampled gamepad frame per tick (`TickInput`)
//! - Control: actuator setpoints and modes (`PositionCommand`, `ControlMode`)
//! - Diagnostics: telemetry snapshots (`TelemetryFrame`)
//!
//! All message types are re-exported at the crate root for convenience.

pub mod control;
pub mod diagnostics;
pub mod input;

pub use control::{ControlMode, PositionCommand};
pub use diagnostics::{ClosedLoopStatus, TelemetryFrame};
pub use input::TickInput;
