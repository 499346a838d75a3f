//! # Core types and traits for the teleop runtime
//!
//! - **Node**: a unit of work the scheduler ticks at a fixed rate
//! - **NodeInfo**: runtime context (state, metrics, logging) handed to every node call
//!
//! ## Node Lifecycle
//!
//! 1. **Construction** - node is built with its collaborators and configuration
//! 2. **Initialization** - `init()` brings up hardware, may fail
//! 3. **Execution** - `tick()` is called once per scheduler period and never fails
//! 4. **Shutdown** - `shutdown()` releases resources

pub mod node;
pub mod node_info_ext;

pub use node::{LogLevel, LogSummary, Node, NodeConfig, NodeInfo, NodeMetrics, NodePriority, NodeState};
pub use node_info_ext::NodeInfoExt;
