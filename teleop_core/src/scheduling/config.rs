//! Scheduler configuration

use crate::error::{TeleopError, TeleopResult};
use crate::params::RuntimeParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and stop conditions for the tick loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Tick frequency in Hz
    pub rate_hz: f64,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Stop after this much wall time
    pub max_duration: Option<Duration>,
    /// Install a Ctrl+C handler when `run()` starts
    pub handle_signals: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            // 20 ms periodic loop of the robot runtime
            rate_hz: 50.0,
            max_ticks: None,
            max_duration: None,
            handle_signals: true,
        }
    }
}

impl SchedulerConfig {
    /// Read `scheduler.*` keys, defaulting anything missing
    pub fn from_params(params: &RuntimeParams) -> TeleopResult<Self> {
        let defaults = Self::default();
        let max_duration_ms: Option<u64> = params.try_get("scheduler.max_duration_ms")?;

        let config = Self {
            rate_hz: params.require_or("scheduler.rate_hz", defaults.rate_hz)?,
            max_ticks: params.try_get("scheduler.max_ticks")?,
            max_duration: max_duration_ms.map(Duration::from_millis),
            handle_signals: params.require_or("scheduler.handle_signals", defaults.handle_signals)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TeleopResult<()> {
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            return Err(TeleopError::config(format!(
                "scheduler rate must be a positive frequency, got {}",
                self.rate_hz
            )));
        }
        Ok(())
    }

    /// Period between tick starts
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz)
    }
}
