//! # Scheduling
//!
//! Fixed-rate, single-threaded tick loop that drives registered nodes:
//!
//! - **Scheduler**: owns the nodes and their lifecycle contexts
//! - **Priorities**: numeric, 0 = ticks first
//!
//! ## Usage
//!
//! ```rust,ignore
//! use teleop_core::{Scheduler, SchedulerConfig};
//!
//! let mut scheduler = Scheduler::new().with_config(SchedulerConfig::default());
//! scheduler.add(Box::new(servo_node), 0, Some(true));
//! scheduler.run()?; // init, tick at 50 Hz until Ctrl+C, shutdown
//! ```

pub mod config;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use scheduler::Scheduler;
