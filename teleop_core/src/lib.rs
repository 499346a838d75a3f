//! # Teleop Core
//!
//! Runtime building blocks for the teleop controller:
//!
//! - **Nodes**: units of work with an init / tick / shutdown lifecycle
//! - **Scheduling**: fixed-rate, single-threaded tick loop
//! - **Params**: YAML-backed runtime parameters
//! - **Errors**: the shared [`TeleopError`] type
//!
//! ## Quick Start
//!
//! ```rust
//! use teleop_core::{Node, NodeInfo, Scheduler};
//!
//! struct CounterNode {
//!     ticks: u64,
//! }
//!
//! impl Node for CounterNode {
//!     fn name(&self) -> &'static str { "counter" }
//!
//!     fn tick(&mut self, _ctx: Option<&mut NodeInfo>) {
//!         self.ticks += 1;
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(CounterNode { ticks: 0 }), 0, None);
//! scheduler.tick_once();
//! assert_eq!(scheduler.tick_count(), 1);
//! ```

pub mod core;
pub mod error;
pub mod params;
pub mod scheduling;

pub use crate::core::{LogLevel, LogSummary, Node, NodeConfig, NodeInfo, NodeInfoExt, NodePriority, NodeState};
pub use error::{TeleopError, TeleopResult};
pub use params::RuntimeParams;
pub use scheduling::{Scheduler, SchedulerConfig};
