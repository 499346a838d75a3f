use crate::error::{TeleopError, TeleopResult};
use colored::Colorize;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Trait for providing lightweight logging summaries of message types
///
/// Messages implement this so nodes can log what they publish without
/// requiring a full `Debug` dump.
pub trait LogSummary {
    /// Return a compact string representation suitable for logging
    fn log_summary(&self) -> String;
}

/// Node states for monitoring and lifecycle management
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Error(String),
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Initializing => write!(f, "Initializing"),
            NodeState::Running => write!(f, "Running"),
            NodeState::Stopping => write!(f, "Stopping"),
            NodeState::Stopped => write!(f, "Stopped"),
            NodeState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Priority levels for node execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodePriority {
    Critical = 0,
    High = 1,
    Normal = 2,
    Low = 3,
    Background = 4,
}

/// Performance metrics for node execution
#[derive(Debug, Clone, Default)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub avg_tick_duration_ms: f64,
    pub max_tick_duration_ms: f64,
    pub last_tick_duration_ms: f64,
    pub messages_sent: u64,
    pub errors_count: u64,
    pub warnings_count: u64,
}

/// Log verbosity for a node context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Quiet,
    Error,
    Warn,
    Info,
    Debug,
}

impl std::str::FromStr for LogLevel {
    type Err = TeleopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "QUIET" => Ok(LogLevel::Quiet),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            other => Err(TeleopError::config(format!("unknown log level '{}'", other))),
        }
    }
}

/// Configuration parameters for node behavior
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub enable_logging: bool,
    pub log_level: LogLevel,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            enable_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

/// Runtime context handed to a node on every lifecycle call
pub struct NodeInfo {
    name: String,
    instance_id: String,

    state: NodeState,
    config: NodeConfig,
    priority: NodePriority,
    metrics: NodeMetrics,

    creation_time: Instant,
    tick_start_time: Option<Instant>,

    // topic -> message count
    published_topics: HashMap<String, u64>,
}

impl NodeInfo {
    pub fn new(node_name: String, logging_enabled: bool) -> Self {
        let config = NodeConfig {
            enable_logging: logging_enabled,
            ..Default::default()
        };

        Self {
            name: node_name,
            instance_id: uuid::Uuid::new_v4().to_string(),
            state: NodeState::Uninitialized,
            config,
            priority: NodePriority::Normal,
            metrics: NodeMetrics::default(),
            creation_time: Instant::now(),
            tick_start_time: None,
            published_topics: HashMap::new(),
        }
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn set_state(&mut self, new_state: NodeState) {
        if self.state != new_state {
            log::trace!("[{}] {} -> {}", self.name, self.state, new_state);
            self.state = new_state;
        }
    }

    pub fn transition_to_error(&mut self, error_msg: String) {
        self.log_error(&error_msg);
        self.set_state(NodeState::Error(error_msg));
    }

    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
    }

    pub fn record_tick(&mut self) {
        if let Some(start_time) = self.tick_start_time.take() {
            let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

            self.metrics.total_ticks += 1;
            self.metrics.last_tick_duration_ms = duration_ms;
            if duration_ms > self.metrics.max_tick_duration_ms {
                self.metrics.max_tick_duration_ms = duration_ms;
            }

            let total = self.metrics.avg_tick_duration_ms * (self.metrics.total_ticks - 1) as f64;
            self.metrics.avg_tick_duration_ms =
                (total + duration_ms) / self.metrics.total_ticks as f64;
        }
    }

    /// Record an outgoing message on `topic` and print it at debug level
    pub fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        let tick_us = self
            .tick_start_time
            .map(|start| start.elapsed().as_micros() as u64)
            .unwrap_or(0);

        log::debug!("[{}] --PUB--> '{}' = {}", self.name, topic, summary);
        if self.enabled(LogLevel::Debug) {
            println!(
                "{} {} {} {} {} = {}",
                format!("[{}]", chrono::Local::now().format("%H:%M:%S%.3f")).cyan(),
                format!("[Tick: {}μs]", tick_us).green(),
                self.name.yellow(),
                "--PUB-->".green().bold(),
                format!("'{}'", topic).magenta(),
                summary
            );
        }

        *self.published_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_sent += 1;
    }

    pub fn log_info(&self, message: &str) {
        log::info!("[{}] {}", self.name, message);
        if self.enabled(LogLevel::Info) {
            eprintln!("{} {} {}", "[INFO]".blue(), format!("[{}]", self.name).yellow(), message);
        }
    }

    pub fn log_warning(&mut self, message: &str) {
        log::warn!("[{}] {}", self.name, message);
        if self.enabled(LogLevel::Warn) {
            eprintln!("{} {} {}", "[WARN]".yellow(), format!("[{}]", self.name).yellow(), message);
        }
        self.metrics.warnings_count += 1;
    }

    pub fn log_error(&mut self, message: &str) {
        log::error!("[{}] {}", self.name, message);
        if self.enabled(LogLevel::Error) {
            eprintln!("{} {} {}", "[ERROR]".red(), format!("[{}]", self.name).yellow(), message);
        }
        self.metrics.errors_count += 1;
    }

    pub fn log_debug(&mut self, message: &str) {
        log::debug!("[{}] {}", self.name, message);
        if self.enabled(LogLevel::Debug) {
            eprintln!(
                "{} {} {}",
                "[DEBUG]".bright_black(),
                format!("[{}]", self.name).yellow(),
                message
            );
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.config.enable_logging && self.config.log_level >= level
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
    pub fn priority(&self) -> NodePriority {
        self.priority
    }
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
    pub fn published_topics(&self) -> &HashMap<String, u64> {
        &self.published_topics
    }
    pub fn uptime(&self) -> Duration {
        self.creation_time.elapsed()
    }

    // Setters
    pub fn set_priority(&mut self, priority: NodePriority) {
        self.priority = priority;
    }
    pub fn set_config(&mut self, config: NodeConfig) {
        self.config = config;
    }
}

/// Trait for nodes driven by the [`Scheduler`](crate::Scheduler)
pub trait Node: Send {
    /// Get the node's name (must be unique)
    fn name(&self) -> &'static str;

    /// Initialize the node (called once at startup)
    fn init(&mut self, ctx: &mut NodeInfo) -> TeleopResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// Main execution step (called once per scheduler tick)
    fn tick(&mut self, ctx: Option<&mut NodeInfo>);

    /// Shutdown the node (called once at cleanup)
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> TeleopResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }

    /// Handle errors (optional override)
    fn on_error(&mut self, error: &str, ctx: &mut NodeInfo) {
        ctx.log_error(&format!("Node error: {}", error));
    }

    /// Get node priority (optional override)
    fn priority(&self) -> NodePriority {
        NodePriority::Normal
    }
}

impl LogSummary for f64 {
    fn log_summary(&self) -> String {
        format!("{:.3}", self)
    }
}

impl LogSummary for i32 {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for bool {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for String {
    fn log_summary(&self) -> String {
        self.clone()
    }
}
