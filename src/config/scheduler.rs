//! Scheduler configuration structure.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_immediate_capacity() -> usize {
    10
}

fn default_worker_thread_name() -> String {
    "jobtick-worker".to_string()
}

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Interval between worker ticks, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Capacity of the bounded immediate-execution slot used by preemption.
    #[serde(default = "default_immediate_capacity")]
    pub immediate_capacity: usize,
    /// OS name of the background worker thread.
    #[serde(default = "default_worker_thread_name")]
    pub worker_thread_name: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            immediate_capacity: default_immediate_capacity(),
            worker_thread_name: default_worker_thread_name(),
        }
    }
}

impl SchedulerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick interval in milliseconds.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the immediate-slot capacity.
    #[must_use]
    pub fn with_immediate_capacity(mut self, capacity: usize) -> Self {
        self.immediate_capacity = capacity;
        self
    }

    /// Set the worker thread name.
    #[must_use]
    pub fn with_worker_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = name.into();
        self
    }

    /// Tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than 0".into());
        }
        if self.immediate_capacity == 0 {
            return Err("immediate_capacity must be greater than 0".into());
        }
        if self.worker_thread_name.is_empty() {
            return Err("worker_thread_name must not be empty".into());
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error description.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: SchedulerConfig =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a configuration from the environment, starting from defaults.
    ///
    /// Loads a `.env` file if one is present, then reads
    /// `JOBTICK_TICK_INTERVAL_MS`, `JOBTICK_IMMEDIATE_CAPACITY`, and
    /// `JOBTICK_WORKER_THREAD_NAME`. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a description of the first unparseable or invalid value.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut cfg = Self::default();
        if let Ok(value) = std::env::var("JOBTICK_TICK_INTERVAL_MS") {
            cfg.tick_interval_ms = value
                .parse()
                .map_err(|e| format!("JOBTICK_TICK_INTERVAL_MS: {e}"))?;
        }
        if let Ok(value) = std::env::var("JOBTICK_IMMEDIATE_CAPACITY") {
            cfg.immediate_capacity = value
                .parse()
                .map_err(|e| format!("JOBTICK_IMMEDIATE_CAPACITY: {e}"))?;
        }
        if let Ok(value) = std::env::var("JOBTICK_WORKER_THREAD_NAME") {
            cfg.worker_thread_name = value;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
