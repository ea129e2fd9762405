//! Excitation definitions: function families, their parameters, and the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Function Families
// ============================================================================

/// Excitation function family, as selected by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExcitationKind {
    #[default]
    Sine,
    #[serde(alias = "saw")]
    Sawtooth,
    Square,
    #[serde(alias = "rampup")]
    RampUp,
    #[serde(alias = "rampdn")]
    RampDown,
    #[serde(alias = "acc")]
    AccelerationFile,
    #[serde(alias = "timeacc")]
    TimeAccelerationFile,
    #[serde(alias = "peernga")]
    StandardRecordFile,
    #[serde(alias = "preset")]
    PresetRecord,
}

/// Grouping used when listing the catalog.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FunctionCategory {
    Harmonic,
    Impulse,
    FromFile,
    Preset,
}

impl fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Harmonic => write!(f, "Harmonic"),
            Self::Impulse => write!(f, "Impulse"),
            Self::FromFile => write!(f, "From File"),
            Self::Preset => write!(f, "Preset"),
        }
    }
}

/// Catalog entry describing one excitation family.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FunctionInfo {
    pub kind: ExcitationKind,
    pub key: &'static str,
    pub full_name: &'static str,
    pub category: FunctionCategory,
    pub note: &'static str,
}

const CATALOG: &[FunctionInfo] = &[
    FunctionInfo {
        kind: ExcitationKind::Sine,
        key: "sine",
        full_name: "Sine Wave",
        category: FunctionCategory::Harmonic,
        note: "",
    },
    FunctionInfo {
        kind: ExcitationKind::Sawtooth,
        key: "sawtooth",
        full_name: "Sawtooth Wave",
        category: FunctionCategory::Harmonic,
        note: "",
    },
    FunctionInfo {
        kind: ExcitationKind::Square,
        key: "square",
        full_name: "Square Wave",
        category: FunctionCategory::Harmonic,
        note: "",
    },
    FunctionInfo {
        kind: ExcitationKind::RampUp,
        key: "ramp-up",
        full_name: "Ramp Up",
        category: FunctionCategory::Impulse,
        note: "",
    },
    FunctionInfo {
        kind: ExcitationKind::RampDown,
        key: "ramp-down",
        full_name: "Ramp Down",
        category: FunctionCategory::Impulse,
        note: "",
    },
    FunctionInfo {
        kind: ExcitationKind::AccelerationFile,
        key: "acceleration-file",
        full_name: "File Containing Accelerations",
        category: FunctionCategory::FromFile,
        note: "Each row contains [acceleration] at a constant time interval",
    },
    FunctionInfo {
        kind: ExcitationKind::TimeAccelerationFile,
        key: "time-acceleration-file",
        full_name: "File Containing Time and Acceleration",
        category: FunctionCategory::FromFile,
        note: "Each row contains [time, acceleration]",
    },
    FunctionInfo {
        kind: ExcitationKind::StandardRecordFile,
        key: "standard-record-file",
        full_name: "PEER NGA File",
        category: FunctionCategory::FromFile,
        note: "An unaltered PEER NGA strong-motion record",
    },
    FunctionInfo {
        kind: ExcitationKind::PresetRecord,
        key: "preset-record",
        full_name: "Preset Ground Motion",
        category: FunctionCategory::Preset,
        note: "The ground-motion record loaded at startup",
    },
];

impl ExcitationKind {
    /// All families with display metadata, in menu order.
    pub fn catalog() -> &'static [FunctionInfo] {
        CATALOG
    }

    pub fn info(self) -> &'static FunctionInfo {
        // CATALOG holds one entry per variant in declaration order
        &CATALOG[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    /// Families whose samples come from a parsed file.
    pub fn needs_file(self) -> bool {
        matches!(
            self,
            Self::AccelerationFile | Self::TimeAccelerationFile | Self::StandardRecordFile
        )
    }

    /// Analytic families parameterised by a function period.
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Sine | Self::Sawtooth | Self::Square)
    }
}

impl fmt::Display for ExcitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExcitationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Self::Sine,
            "sawtooth" | "saw" => Self::Sawtooth,
            "square" => Self::Square,
            "ramp-up" | "rampup" => Self::RampUp,
            "ramp-down" | "rampdn" => Self::RampDown,
            "acceleration-file" | "acc" => Self::AccelerationFile,
            "time-acceleration-file" | "timeacc" => Self::TimeAccelerationFile,
            "standard-record-file" | "peernga" => Self::StandardRecordFile,
            "preset-record" | "preset" => Self::PresetRecord,
            other => {
                let known: Vec<&str> = CATALOG.iter().map(|i| i.key).collect();
                return Err(format!(
                    "unknown excitation function '{other}' (expected one of: {})",
                    known.join(", ")
                ));
            }
        };
        Ok(kind)
    }
}

// ============================================================================
// Per-Family Parameters
// ============================================================================

/// Parameters shared by the periodic families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Harmonic {
    pub amplitude: f64,
    /// Function period (s)
    pub period: f64,
    pub vertical_shift: f64,
    pub horizontal_shift: f64,
}

/// Time/acceleration pairs split into parallel arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeAccelerationRecord {
    pub times: Vec<f64>,
    pub accelerations: Vec<f64>,
}

impl TimeAccelerationRecord {
    /// Split a flat `[t0, a0, t1, a1, ...]` array in one pass.
    ///
    /// Even indices become times, odd indices accelerations. A trailing
    /// unpaired value is ignored, as are pairs whose time is not finite.
    /// Pairs are left in time order so bracketing can binary-search.
    pub fn from_interleaved(flat: &[f64]) -> Self {
        let mut record = Self {
            times: Vec::with_capacity(flat.len() / 2),
            accelerations: Vec::with_capacity(flat.len() / 2),
        };
        for pair in flat.chunks_exact(2) {
            if pair[0].is_finite() {
                record.times.push(pair[0]);
                record.accelerations.push(pair[1]);
            }
        }
        if !record.times.windows(2).all(|w| w[0] <= w[1]) {
            let mut pairs: Vec<(f64, f64)> = record
                .times
                .iter()
                .copied()
                .zip(record.accelerations.iter().copied())
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (times, accelerations): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            record.times = times;
            record.accelerations = accelerations;
        }
        record
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Tagged excitation function, each variant carrying only what it needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "function", rename_all = "kebab-case")]
pub enum ExcitationFunction {
    Sine(Harmonic),
    Sawtooth(Harmonic),
    Square(Harmonic),
    RampUp { amplitude: f64 },
    RampDown { amplitude: f64 },
    /// Bare accelerations sampled at the configured time step
    AccelerationFile { samples: Vec<f64>, scale_factor: f64 },
    /// Unevenly spaced (time, acceleration) pairs
    TimeAccelerationFile {
        record: TimeAccelerationRecord,
        scale_factor: f64,
    },
    /// Standard strong-motion record, uniform interval
    StandardRecordFile { samples: Vec<f64>, scale_factor: f64 },
    /// The process-wide preset record
    PresetRecord { scale_factor: f64 },
}

impl ExcitationFunction {
    pub fn kind(&self) -> ExcitationKind {
        match self {
            Self::Sine(_) => ExcitationKind::Sine,
            Self::Sawtooth(_) => ExcitationKind::Sawtooth,
            Self::Square(_) => ExcitationKind::Square,
            Self::RampUp { .. } => ExcitationKind::RampUp,
            Self::RampDown { .. } => ExcitationKind::RampDown,
            Self::AccelerationFile { .. } => ExcitationKind::AccelerationFile,
            Self::TimeAccelerationFile { .. } => ExcitationKind::TimeAccelerationFile,
            Self::StandardRecordFile { .. } => ExcitationKind::StandardRecordFile,
            Self::PresetRecord { .. } => ExcitationKind::PresetRecord,
        }
    }

    /// Function period for the periodic families.
    pub fn period(&self) -> Option<f64> {
        match self {
            Self::Sine(h) | Self::Sawtooth(h) | Self::Square(h) => Some(h.period),
            _ => None,
        }
    }
}

/// Complete, immutable excitation request handed to the synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExcitationSpec {
    pub function: ExcitationFunction,
    /// Sampling interval (s)
    pub time_step: f64,
    /// Duration over which the function is evaluated (s)
    pub excitation_duration: f64,
    /// Total series span including the zero tail (s)
    pub total_duration: f64,
}

// ============================================================================
// Flat Parameter Set
// ============================================================================

/// Flat excitation parameters as entered by a user or read from config.
///
/// Every family reads the subset it needs when converted with [`build`].
///
/// [`build`]: ExcitationParams::build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExcitationParams {
    pub function: ExcitationKind,
    pub amplitude: f64,
    pub function_period: f64,
    pub vertical_shift: f64,
    pub horizontal_shift: f64,
    pub excitation_duration: f64,
    pub total_duration: f64,
    pub time_step: f64,
    pub scale_factor: f64,
}

impl Default for ExcitationParams {
    fn default() -> Self {
        Self {
            function: ExcitationKind::Sine,
            amplitude: 10.0,
            function_period: 0.4,
            vertical_shift: 0.0,
            horizontal_shift: 0.0,
            excitation_duration: 5.0,
            total_duration: 15.0,
            time_step: 0.02,
            scale_factor: 9.81,
        }
    }
}

impl ExcitationParams {
    /// Assemble the tagged spec. `procfile` is the flat numeric array parsed
    /// from an input file and is ignored by the analytic families.
    pub fn build(&self, procfile: &[f64]) -> ExcitationSpec {
        let harmonic = Harmonic {
            amplitude: self.amplitude,
            period: self.function_period,
            vertical_shift: self.vertical_shift,
            horizontal_shift: self.horizontal_shift,
        };
        let scale_factor = self.scale_factor;
        let function = match self.function {
            ExcitationKind::Sine => ExcitationFunction::Sine(harmonic),
            ExcitationKind::Sawtooth => ExcitationFunction::Sawtooth(harmonic),
            ExcitationKind::Square => ExcitationFunction::Square(harmonic),
            ExcitationKind::RampUp => ExcitationFunction::RampUp {
                amplitude: self.amplitude,
            },
            ExcitationKind::RampDown => ExcitationFunction::RampDown {
                amplitude: self.amplitude,
            },
            ExcitationKind::AccelerationFile => ExcitationFunction::AccelerationFile {
                samples: procfile.to_vec(),
                scale_factor,
            },
            ExcitationKind::TimeAccelerationFile => ExcitationFunction::TimeAccelerationFile {
                record: TimeAccelerationRecord::from_interleaved(procfile),
                scale_factor,
            },
            ExcitationKind::StandardRecordFile => ExcitationFunction::StandardRecordFile {
                samples: procfile.to_vec(),
                scale_factor,
            },
            ExcitationKind::PresetRecord => ExcitationFunction::PresetRecord { scale_factor },
        };
        ExcitationSpec {
            function,
            time_step: self.time_step,
            excitation_duration: self.excitation_duration,
            total_duration: self.total_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_variant_order() {
        for info in ExcitationKind::catalog() {
            assert_eq!(info.kind.info().key, info.key);
        }
        assert_eq!(ExcitationKind::catalog().len(), 9);
    }

    #[test]
    fn test_parse_short_names() {
        assert_eq!("saw".parse::<ExcitationKind>().unwrap(), ExcitationKind::Sawtooth);
        assert_eq!("rampdn".parse::<ExcitationKind>().unwrap(), ExcitationKind::RampDown);
        assert_eq!(
            "PEERNGA".parse::<ExcitationKind>().unwrap(),
            ExcitationKind::StandardRecordFile
        );
        assert!("triangle".parse::<ExcitationKind>().is_err());
    }

    #[test]
    fn test_deinterleave_alternates() {
        let rec = TimeAccelerationRecord::from_interleaved(&[0.0, 1.0, 0.5, 2.0, 1.0, 3.0]);
        assert_eq!(rec.times, vec![0.0, 0.5, 1.0]);
        assert_eq!(rec.accelerations, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_deinterleave_sorts_out_of_order_pairs() {
        let rec = TimeAccelerationRecord::from_interleaved(&[1.0, 3.0, 0.0, 1.0, 0.5, 2.0]);
        assert_eq!(rec.times, vec![0.0, 0.5, 1.0]);
        assert_eq!(rec.accelerations, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_deinterleave_drops_dangling_value() {
        let rec = TimeAccelerationRecord::from_interleaved(&[0.0, 1.0, 0.5]);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_build_routes_procfile() {
        let params = ExcitationParams {
            function: ExcitationKind::AccelerationFile,
            scale_factor: 2.0,
            ..ExcitationParams::default()
        };
        let spec = params.build(&[1.0, 2.0]);
        assert_eq!(
            spec.function,
            ExcitationFunction::AccelerationFile {
                samples: vec![1.0, 2.0],
                scale_factor: 2.0
            }
        );
        assert_eq!(spec.function.period(), None);
    }

    #[test]
    fn test_kind_deserializes_from_aliases() {
        #[derive(Deserialize)]
        struct Wrap {
            function: ExcitationKind,
        }
        let w: Wrap = toml::from_str(r#"function = "timeacc""#).unwrap();
        assert_eq!(w.function, ExcitationKind::TimeAccelerationFile);
        let w: Wrap = toml::from_str(r#"function = "ramp-up""#).unwrap();
        assert_eq!(w.function, ExcitationKind::RampUp);
    }
}
