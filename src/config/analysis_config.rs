//! Analysis Configuration - default excitation, oscillator and spectrum values as TOML
//!
//! Each section implements `Default` with the values the tool starts with,
//! so running without a config file gives the standard demonstration case
//! (10-amplitude sine, T = 0.5 s, 5 % damping).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::types::{DampingRatio, ExcitationParams, OscillatorParams, SpectrumRequest};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SDOF_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sdof_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$SDOF_CONFIG` env var
/// 2. `./sdof_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalysisConfig {
    /// Oscillator under analysis
    #[serde(default)]
    pub oscillator: OscillatorConfig,

    /// Excitation function and sampling
    #[serde(default)]
    pub excitation: ExcitationParams,

    /// Response spectrum sweep
    #[serde(default)]
    pub spectrum: SpectrumConfig,

    /// Preset ground-motion record
    #[serde(default)]
    pub preset: PresetConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SDOF_CONFIG` environment variable
    /// 2. `./sdof_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from SDOF_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SDOF_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SDOF_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analysis config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys and suspicious values are logged as warnings; impossible
    /// values fail with [`ConfigError::Validation`].
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate config text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;

        let (_, warnings) = super::validation::validate_physical_ranges(&config);
        for w in warnings {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Analysis config saved");
        Ok(())
    }

    /// Reject values no analysis can use.
    ///
    /// Rules:
    /// - Periods, time step and excitation duration must be finite and > 0
    /// - Damping must be >= 0 and below critical after percentage normalisation
    /// - Spectrum range must satisfy `min_period < max_period` with at least one point
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_positive(self.oscillator.period, "oscillator.period", &mut errors);
        let damping = self.oscillator.damping_ratio();
        if !damping.is_underdamped() {
            errors.push(format!(
                "oscillator.damping: {} must be in [0, 1) as a fraction or [0, 100) as a percentage",
                self.oscillator.damping
            ));
        }

        let e = &self.excitation;
        Self::check_positive(e.time_step, "excitation.time_step", &mut errors);
        Self::check_positive(
            e.excitation_duration,
            "excitation.excitation_duration",
            &mut errors,
        );
        if !e.total_duration.is_finite() {
            errors.push(format!(
                "excitation.total_duration: must be finite (got {})",
                e.total_duration
            ));
        }
        if e.function.is_periodic() {
            Self::check_positive(e.function_period, "excitation.function_period", &mut errors);
        }

        let s = &self.spectrum;
        Self::check_positive(s.min_period, "spectrum.min_period", &mut errors);
        Self::check_positive(s.max_period, "spectrum.max_period", &mut errors);
        if s.min_period >= s.max_period {
            errors.push(format!(
                "spectrum: min_period ({:.3}) must be < max_period ({:.3})",
                s.min_period, s.max_period
            ));
        }
        if s.points == 0 {
            errors.push("spectrum.points: must be > 0".to_string());
        }

        let (range_errors, _) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name}: must be finite and > 0 (got {value})"));
        }
    }

    /// Oscillator parameters sharing the excitation's sampling.
    pub fn oscillator_params(&self) -> OscillatorParams {
        OscillatorParams {
            period: self.oscillator.period,
            damping: self.oscillator.damping_ratio(),
            time_step: self.excitation.time_step,
            total_duration: self.excitation.total_duration,
        }
    }

    pub fn spectrum_request(&self) -> SpectrumRequest {
        SpectrumRequest {
            damping: self.oscillator.damping_ratio(),
            min_period: self.spectrum.min_period,
            max_period: self.spectrum.max_period,
            points: self.spectrum.points,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Oscillator Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OscillatorConfig {
    /// Natural period T (s)
    #[serde(default = "default_period")]
    pub period: f64,

    /// Damping as entered: values above 1 are a percentage
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_period() -> f64 {
    defaults::OSCILLATOR_PERIOD
}
fn default_damping() -> f64 {
    defaults::OSCILLATOR_DAMPING_PERCENT
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            damping: default_damping(),
        }
    }
}

impl OscillatorConfig {
    pub fn damping_ratio(&self) -> DampingRatio {
        DampingRatio::from_input(self.damping)
    }
}

// ============================================================================
// Spectrum Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrumConfig {
    /// Shortest oscillator period (s)
    #[serde(default = "default_min_period")]
    pub min_period: f64,

    /// Longest oscillator period (s)
    #[serde(default = "default_max_period")]
    pub max_period: f64,

    /// Number of log-spaced periods
    #[serde(default = "default_points")]
    pub points: usize,
}

fn default_min_period() -> f64 {
    defaults::SPECTRUM_MIN_PERIOD
}
fn default_max_period() -> f64 {
    defaults::SPECTRUM_MAX_PERIOD
}
fn default_points() -> usize {
    defaults::SPECTRUM_POINTS
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            min_period: default_min_period(),
            max_period: default_max_period(),
            points: default_points(),
        }
    }
}

// ============================================================================
// Preset Config
// ============================================================================

/// Where to find the preset ground-motion record, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetConfig {
    /// Display name of the record
    #[serde(default = "default_preset_name")]
    pub name: String,

    /// Time/acceleration pair file loaded once at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_preset_name() -> String {
    "preset".to_string()
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            name: default_preset_name(),
            path: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExcitationKind;

    #[test]
    fn test_default_config_validates() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: AnalysisConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.oscillator.period, 0.5);
        assert_eq!(config.oscillator.damping, 5.0);
        assert_eq!(config.excitation.function, ExcitationKind::Sine);
        assert_eq!(config.excitation.time_step, 0.02);
        assert_eq!(config.excitation.total_duration, 15.0);
        assert_eq!(config.excitation.scale_factor, 9.81);
        assert_eq!(config.spectrum.points, 100);
        assert!(config.preset.path.is_none());
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[oscillator]
period = 1.2

[excitation]
function = "rampup"
amplitude = 3.0
"#;
        let config: AnalysisConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.oscillator.period, 1.2);
        assert_eq!(config.excitation.function, ExcitationKind::RampUp);
        assert_eq!(config.excitation.amplitude, 3.0);
        // Non-overridden values retain defaults
        assert_eq!(config.oscillator.damping, 5.0);
        assert_eq!(config.excitation.function_period, 0.4);
    }

    #[test]
    fn test_validation_catches_inverted_spectrum_range() {
        let mut config = AnalysisConfig::default();
        config.spectrum.min_period = 3.0;
        config.spectrum.max_period = 1.0;
        let result = config.validate();
        assert!(result.is_err(), "Inverted range should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("min_period")));
        }
    }

    #[test]
    fn test_validation_catches_critical_damping() {
        let mut config = AnalysisConfig::default();
        config.oscillator.damping = 100.0;
        assert!(config.validate().is_err());
        config.oscillator.damping = 99.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_function_period_ignored_for_ramps() {
        let mut config = AnalysisConfig::default();
        config.excitation.function = ExcitationKind::RampDown;
        config.excitation.function_period = 0.0;
        assert!(config.validate().is_ok());
        config.excitation.function = ExcitationKind::Square;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = AnalysisConfig::default();
        config.preset.path = Some(PathBuf::from("records/preset.txt"));
        let text = config.to_toml().unwrap();
        let back: AnalysisConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_derived_requests_share_damping() {
        let config = AnalysisConfig::default();
        let osc = config.oscillator_params();
        let spec = config.spectrum_request();
        assert_eq!(osc.damping, spec.damping);
        assert!((osc.damping.fraction() - 0.05).abs() < 1e-15);
        assert_eq!(osc.time_step, 0.02);
    }
}
