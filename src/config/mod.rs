//! Analysis Configuration Module
//!
//! Default excitation, oscillator and spectrum parameters loaded from TOML,
//! so repeated studies do not need every value on the command line.
//!
//! ## Loading Order
//!
//! 1. `SDOF_CONFIG` environment variable (path to TOML file)
//! 2. `sdof_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, after command-line overrides are
//! applied, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(AnalysisConfig::load());
//!
//! // Anywhere in the codebase:
//! let dt = config::get().excitation.time_step;
//! ```

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;

use std::sync::{LazyLock, OnceLock};

/// Global analysis configuration, initialized once at startup.
static ANALYSIS_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

static DEFAULT_CONFIG: LazyLock<AnalysisConfig> = LazyLock::new(AnalysisConfig::default);

/// Initialize the global analysis configuration. Only the first call takes effect.
pub fn init(config: AnalysisConfig) {
    if ANALYSIS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The global configuration, or built-in defaults before `init()` runs.
pub fn get() -> &'static AnalysisConfig {
    ANALYSIS_CONFIG.get().unwrap_or(&*DEFAULT_CONFIG)
}
