//! # Teleop
//!
//! Drive a closed-loop position servo from a gamepad: three buttons jump to
//! preset positions, the stick nudges the setpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teleop::prelude::*;
//! use teleop::library::hardware::{ScriptedInput, StdoutTelemetry};
//!
//! fn main() -> Result<()> {
//!     let node = PositionServoNode::new(
//!         ScriptedInput::demo(),
//!         SimulatedActuator::new("right", 120.0),
//!         StdoutTelemetry,
//!     );
//!
//!     let mut scheduler = Scheduler::new();
//!     scheduler.add(Box::new(node), 0, Some(true));
//!     scheduler.run_for(Duration::from_secs(10))
//! }
//! ```

// Re-export core components
pub use teleop_core::{self, *};

// Re-export standard library with alias
pub use teleop_library as library;

/// The teleop prelude - everything you need to get started
pub mod prelude {
    // Core node types
    pub use teleop_core::core::node::NodeConfig;
    pub use teleop_core::core::{Node, NodeInfo, NodeInfoExt, NodeState};

    // Scheduling and parameters
    pub use teleop_core::params::RuntimeParams;
    pub use teleop_core::scheduling::{Scheduler, SchedulerConfig};

    // Error types
    pub use teleop_core::error::{TeleopError, TeleopResult};
    pub type Result<T> = TeleopResult<T>;

    // Common std types
    pub use std::sync::{Arc, Mutex};
    pub use std::time::{Duration, Instant};

    // Common traits
    pub use serde::{Deserialize, Serialize};

    // Re-export anyhow for error handling
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};

    // Messages, hardware interfaces and the servo node
    pub use teleop_library::prelude::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get teleop version
pub fn version() -> &'static str {
    VERSION
}
