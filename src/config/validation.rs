//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Unknown keys only ever warn.

use std::collections::HashSet;

use super::defaults::MAX_SERIES_POINTS;
use crate::types::ExcitationKind;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AnalysisConfig`.
///
/// Maintained by hand to match the struct hierarchy in analysis_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [oscillator]
        "oscillator",
        "oscillator.period",
        "oscillator.damping",
        // [excitation]
        "excitation",
        "excitation.function",
        "excitation.amplitude",
        "excitation.function_period",
        "excitation.vertical_shift",
        "excitation.horizontal_shift",
        "excitation.excitation_duration",
        "excitation.total_duration",
        "excitation.time_step",
        "excitation.scale_factor",
        // [spectrum]
        "spectrum",
        "spectrum.min_period",
        "spectrum.max_period",
        "spectrum.points",
        // [preset]
        "preset",
        "preset.name",
        "preset.path",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so the suggestion does
/// not depend on hash order.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails: TOML syntax errors are left for the serde pass to report.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

fn warning(field: &str, message: String) -> ValidationWarning {
    ValidationWarning {
        field: field.to_string(),
        message,
        suggestion: None,
    }
}

/// Validate physical ranges on a parsed `AnalysisConfig`.
///
/// Returns (errors, warnings). Errors are values no computation can use;
/// warnings are runs that will work but give coarse or degenerate output.
pub fn validate_physical_ranges(
    config: &super::AnalysisConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let e = &config.excitation;

    for (name, value) in [
        ("excitation.amplitude", e.amplitude),
        ("excitation.vertical_shift", e.vertical_shift),
        ("excitation.horizontal_shift", e.horizontal_shift),
        ("excitation.scale_factor", e.scale_factor),
    ] {
        if !value.is_finite() {
            errors.push(format!("{name} = {value} must be finite"));
        }
    }

    // The recurrence is exact for piecewise-linear forcing, but a step
    // coarser than T/10 misses most of the response peak.
    if e.time_step > 0.0 && e.time_step > config.oscillator.period / 10.0 {
        warnings.push(warning(
            "excitation.time_step",
            format!(
                "time_step = {} is coarser than oscillator.period / 10 ({:.4}); peaks will be under-resolved",
                e.time_step,
                config.oscillator.period / 10.0
            ),
        ));
    }

    if e.function.is_periodic() && e.time_step > 0.0 && e.time_step > e.function_period / 4.0 {
        warnings.push(warning(
            "excitation.time_step",
            format!(
                "time_step = {} samples the {} wave fewer than 4 times per period",
                e.time_step,
                e.function.key()
            ),
        ));
    }

    if e.total_duration < e.excitation_duration {
        warnings.push(warning(
            "excitation.total_duration",
            format!(
                "total_duration = {} is shorter than excitation_duration = {}; response will be truncated",
                e.total_duration, e.excitation_duration
            ),
        ));
    }

    if e.time_step > 0.0 && e.total_duration / e.time_step > MAX_SERIES_POINTS as f64 {
        warnings.push(warning(
            "excitation.total_duration",
            format!(
                "total_duration / time_step exceeds {MAX_SERIES_POINTS} points; computations will return degenerate results"
            ),
        ));
    }

    if config.spectrum.points > 1000 {
        warnings.push(warning(
            "spectrum.points",
            format!(
                "spectrum.points = {} is unusually dense (typical: 50-300)",
                config.spectrum.points
            ),
        ));
    }

    if e.function.needs_file() && e.scale_factor == 0.0 {
        warnings.push(warning(
            "excitation.scale_factor",
            "scale_factor = 0 zeroes every file-driven excitation".to_string(),
        ));
    }

    if e.function == ExcitationKind::PresetRecord && config.preset.path.is_none() {
        warnings.push(warning(
            "preset.path",
            "function = preset but no preset.path is configured; excitation will be zero".to_string(),
        ));
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
