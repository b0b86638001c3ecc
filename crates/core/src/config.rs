//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Boot address, reset length, and commit-poll ceiling.
//! 2. **Batch controls:** Quit-on-limit and the periodic report interval.
//! 3. **Tracing:** Instruction-trace ring enablement and depth.
//!
//! Configuration is supplied as JSON (`Config::from_json_file`) or built from `Config::default()`
//! and overridden by the CLI.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::SimError;
use crate::common::constants;

/// Default configuration constants for the simulator.
mod defaults {
    /// Reset vector of the design.
    pub const BOOT_PC: u32 = super::constants::BOOT_PC;

    /// Cycles reset is held asserted at startup.
    pub const RESET_CYCLES: u32 = super::constants::RESET_CYCLES;

    /// Commit-poll ceiling in cycles.
    pub const COMMIT_TIMEOUT: u32 = super::constants::COMMIT_TIMEOUT_CYCLES;

    /// Periodic prediction report interval (0 disables).
    pub const REPORT_INTERVAL: u64 = 0;

    /// Number of commits kept by the instruction-trace ring.
    pub const ITRACE_DEPTH: usize = 16;
}

/// Root configuration structure.
///
/// # Example
///
/// ```
/// use npcsim_core::config::Config;
///
/// let json = r#"{ "batch": { "quit_on_limit": true, "report_interval": 50000 } }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.batch.quit_on_limit);
/// assert_eq!(config.general.boot_pc, 0x8000_0000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Boot and driver settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Batch-mode controls.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Instruction-trace settings.
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Loads a configuration from a JSON file; absent keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Boot and driver configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// PC the design must expose once reset is released.
    #[serde(default = "GeneralConfig::default_boot_pc")]
    pub boot_pc: u32,

    /// Full cycles reset is held asserted at startup.
    #[serde(default = "GeneralConfig::default_reset_cycles")]
    pub reset_cycles: u32,

    /// Cycles the commit poller waits before giving up on an instruction.
    #[serde(default = "GeneralConfig::default_commit_timeout")]
    pub commit_timeout: u32,
}

impl GeneralConfig {
    fn default_boot_pc() -> u32 {
        defaults::BOOT_PC
    }

    fn default_reset_cycles() -> u32 {
        defaults::RESET_CYCLES
    }

    fn default_commit_timeout() -> u32 {
        defaults::COMMIT_TIMEOUT
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            boot_pc: defaults::BOOT_PC,
            reset_cycles: defaults::RESET_CYCLES,
            commit_timeout: defaults::COMMIT_TIMEOUT,
        }
    }
}

/// Batch-mode controls for fixed-window benchmarking.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Stop with `Quit` when a run request exhausts its instruction budget.
    #[serde(default)]
    pub quit_on_limit: bool,

    /// Emit a `[PCPRED]` progress line every N retired instructions (0 disables).
    #[serde(default = "BatchConfig::default_report_interval")]
    pub report_interval: u64,
}

impl BatchConfig {
    fn default_report_interval() -> u64 {
        defaults::REPORT_INTERVAL
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            quit_on_limit: false,
            report_interval: defaults::REPORT_INTERVAL,
        }
    }
}

/// Instruction-trace configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    /// Keep a ring of recent commits and dump it when the run aborts.
    #[serde(default)]
    pub itrace: bool,

    /// Number of commits held by the ring.
    #[serde(default = "TraceConfig::default_itrace_depth")]
    pub itrace_depth: usize,
}

impl TraceConfig {
    fn default_itrace_depth() -> usize {
        defaults::ITRACE_DEPTH
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            itrace: false,
            itrace_depth: defaults::ITRACE_DEPTH,
        }
    }
}
