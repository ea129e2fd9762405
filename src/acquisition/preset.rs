//! Preset ground-motion record
//!
//! A named time/acceleration record loaded once at startup and shared
//! read-only by every computation afterwards.
//!
//! ```ignore
//! // In main():
//! preset::init(GroundMotionRecord::load("El Centro", path)?);
//!
//! // In the synthesizer:
//! let record = preset::current_or_empty();
//! ```
//!
//! Until `init()` runs, lookups see an empty record and the preset
//! excitation evaluates to zero everywhere.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use super::record_parser::{load_record_file, RecordError, RecordFormat};
use crate::types::TimeAccelerationRecord;

/// A named, uniformly sampled ground-motion record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GroundMotionRecord {
    pub name: String,
    pub times: Vec<f64>,
    pub accelerations: Vec<f64>,
}

static EMPTY_RECORD: GroundMotionRecord = GroundMotionRecord {
    name: String::new(),
    times: Vec::new(),
    accelerations: Vec::new(),
};

impl GroundMotionRecord {
    pub fn new(name: impl Into<String>, times: Vec<f64>, accelerations: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            times,
            accelerations,
        }
    }

    /// Build from an interleaved `[t0, a0, t1, a1, ...]` array.
    pub fn from_interleaved(name: impl Into<String>, flat: &[f64]) -> Self {
        let TimeAccelerationRecord {
            times,
            accelerations,
        } = TimeAccelerationRecord::from_interleaved(flat);
        Self::new(name, times, accelerations)
    }

    /// Read a time/acceleration pair file from disk.
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, RecordError> {
        let parsed = load_record_file(path, RecordFormat::TimeAccelerationPairs)?;
        let record = Self::from_interleaved(name, &parsed.values);
        if record.is_empty() {
            return Err(RecordError::Empty(path.to_path_buf()));
        }
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.times.len().min(self.accelerations.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sampling interval taken from the first two samples, 0.0 if undefined.
    pub fn time_step(&self) -> f64 {
        match self.times.as_slice() {
            [t0, t1, ..] => t1 - t0,
            _ => 0.0,
        }
    }

    /// Nearest-sample acceleration at time `t`, or 0.0 outside the record.
    pub fn nearest(&self, t: f64) -> f64 {
        let step = self.time_step();
        let Some(&start) = self.times.first() else {
            return 0.0;
        };
        if !(step.is_finite() && step > 0.0) || t < start {
            return 0.0;
        }
        let index = ((t - start) / step).round() as usize;
        if index >= self.len() {
            return 0.0;
        }
        self.accelerations[index]
    }
}

// ============================================================================
// Process-Wide Preset
// ============================================================================

static PRESET: OnceLock<GroundMotionRecord> = OnceLock::new();

/// Install the preset record. Only the first call takes effect.
pub fn init(record: GroundMotionRecord) {
    let name = record.name.clone();
    let points = record.len();
    if PRESET.set(record).is_err() {
        warn!("preset::init() called more than once, ignoring");
        return;
    }
    info!(name = %name, points, "Preset ground-motion record loaded");
}

/// The preset record, if it has been loaded.
pub fn get() -> Option<&'static GroundMotionRecord> {
    PRESET.get()
}

/// The preset record, or an empty record while none is loaded.
pub fn current_or_empty() -> &'static GroundMotionRecord {
    PRESET.get().unwrap_or(&EMPTY_RECORD)
}

pub fn is_loaded() -> bool {
    PRESET.get().is_some()
}
