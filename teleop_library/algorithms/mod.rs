//! Pure computational pieces with no I/O
//!
//! - **position_arbiter**: preset / stick arbitration of a position setpoint
//! - **throttle**: tick-count rate limiting for telemetry

pub mod position_arbiter;
pub mod throttle;

pub use position_arbiter::{ArbiterConfig, ArbiterState, PositionArbiter};
pub use throttle::TickThrottle;
