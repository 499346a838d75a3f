use super::config::SchedulerConfig;
use crate::core::{Node, NodeInfo, NodeState};
use crate::error::TeleopResult;
use colored::Colorize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Node registration with its lifecycle context
struct RegisteredNode {
    node: Box<dyn Node>,
    priority: u32,
    initialized: bool,
    context: NodeInfo,
}

/// Central orchestrator: holds nodes, drives the fixed-rate tick loop.
///
/// Every pass ticks each running node once, lowest priority number first,
/// on the calling thread. Nodes never run concurrently with each other.
pub struct Scheduler {
    nodes: Vec<RegisteredNode>,
    running: Arc<Mutex<bool>>,
    config: SchedulerConfig,
    scheduler_name: String,
    tick_count: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create an empty scheduler with the default 50 Hz configuration.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            running: Arc::new(Mutex::new(true)),
            config: SchedulerConfig::default(),
            scheduler_name: "TeleopScheduler".to_string(),
            tick_count: 0,
        }
    }

    /// Apply a configuration (builder pattern)
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    /// Set scheduler name (for logging)
    pub fn with_name(mut self, name: &str) -> Self {
        self.scheduler_name = name.to_string();
        self
    }

    /// Register a node. Lower `priority` ticks first; ties keep insertion order.
    ///
    /// # Example
    /// ```ignore
    /// scheduler.add(Box::new(servo_node), 0, Some(true));
    /// ```
    pub fn add(
        &mut self,
        node: Box<dyn Node>,
        priority: u32,
        logging_enabled: Option<bool>,
    ) -> &mut Self {
        let node_name = node.name().to_string();
        let logging_enabled = logging_enabled.unwrap_or(false);

        let mut context = NodeInfo::new(node_name.clone(), logging_enabled);
        context.set_priority(node.priority());

        // stable sort keeps insertion order among equal priorities
        self.nodes.push(RegisteredNode {
            node,
            priority,
            initialized: false,
            context,
        });
        self.nodes.sort_by_key(|registered| registered.priority);

        log::info!(
            "Added node '{}' with priority {} (logging: {})",
            node_name,
            priority,
            logging_enabled
        );

        self
    }

    /// Check if the scheduler is running
    pub fn is_running(&self) -> bool {
        self.running.lock().map(|running| *running).unwrap_or(false)
    }

    /// Request the loop to exit after the current pass
    pub fn stop(&self) {
        if let Ok(mut running) = self.running.lock() {
            *running = false;
        }
    }

    /// Handle that stops the loop from another thread
    pub fn stop_handle(&self) -> Arc<Mutex<bool>> {
        self.running.clone()
    }

    /// Number of completed passes
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn node_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|registered| registered.node.name()).collect()
    }

    /// State of a registered node's context
    pub fn node_state(&self, name: &str) -> Option<&NodeState> {
        self.nodes
            .iter()
            .find(|registered| registered.node.name() == name)
            .map(|registered| registered.context.state())
    }

    /// Initialize any node not yet initialized.
    ///
    /// A node whose `init` fails is moved to the error state and never ticked.
    pub fn init_all(&mut self) {
        for registered in self.nodes.iter_mut().filter(|r| !r.initialized) {
            let ctx = &mut registered.context;
            ctx.set_state(NodeState::Initializing);
            match registered.node.init(ctx) {
                Ok(()) => {
                    ctx.set_state(NodeState::Running);
                    log::info!("Initialized node '{}'", registered.node.name());
                }
                Err(e) => {
                    ctx.transition_to_error(format!("Initialization failed: {}", e));
                }
            }
            registered.initialized = true;
        }
    }

    /// Run exactly one pass over all running nodes
    pub fn tick_once(&mut self) {
        self.init_all();

        for registered in self.nodes.iter_mut() {
            if registered.context.state() != &NodeState::Running {
                continue;
            }
            let ctx = &mut registered.context;
            ctx.start_tick();
            registered.node.tick(Some(&mut *ctx));
            ctx.record_tick();
        }

        self.tick_count += 1;
    }

    /// Shut down every initialized node
    pub fn shutdown_all(&mut self) {
        for registered in self.nodes.iter_mut().filter(|r| r.initialized) {
            let ctx = &mut registered.context;
            if ctx.state() == &NodeState::Stopped {
                continue;
            }
            ctx.set_state(NodeState::Stopping);
            match registered.node.shutdown(ctx) {
                Ok(()) => log::info!("Shutdown node '{}' successfully", registered.node.name()),
                Err(e) => {
                    let message = e.to_string();
                    registered.node.on_error(&message, ctx);
                }
            }
            ctx.set_state(NodeState::Stopped);
        }
    }

    /// Main loop with signal handling and cleanup
    pub fn run(&mut self) -> TeleopResult<()> {
        self.config.validate()?;
        let period = self.config.period();

        if self.config.handle_signals {
            let running = self.running.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                eprintln!("{}", "\nCtrl+C received! Shutting down scheduler...".red());
                if let Ok(mut r) = running.lock() {
                    *r = false;
                }
            }) {
                log::warn!("Failed to set signal handler: {}", e);
            }
        }

        log::info!(
            "Scheduler '{}' running {} node(s) at {:.1} Hz",
            self.scheduler_name,
            self.nodes.len(),
            self.config.rate_hz
        );

        let start_time = Instant::now();
        let mut next_tick = start_time;

        while self.is_running() {
            if let Some(max_ticks) = self.config.max_ticks {
                if self.tick_count >= max_ticks {
                    log::info!("Scheduler reached tick limit of {}", max_ticks);
                    break;
                }
            }
            if let Some(max_duration) = self.config.max_duration {
                if start_time.elapsed() >= max_duration {
                    log::info!("Scheduler reached time limit of {:?}", max_duration);
                    break;
                }
            }

            self.tick_once();

            // Fixed-rate: schedule against the ideal timeline, skip missed slots
            next_tick += period;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                log::debug!("Tick overran its {:?} period", period);
                next_tick = now;
            }
        }

        self.shutdown_all();
        log::info!("Scheduler shutdown complete after {} ticks", self.tick_count);
        Ok(())
    }

    /// Run all nodes for a specified duration, then shut down
    pub fn run_for(&mut self, duration: Duration) -> TeleopResult<()> {
        self.config.max_duration = Some(duration);
        self.run()
    }
}
