//! Oscillator parameters and the damping-ratio input contract

use serde::{Deserialize, Serialize};

/// Damping ratio as a fraction of critical damping.
///
/// Inputs above 1.0 are read as a percentage (`5.0` → `0.05`). This is the
/// single normalisation rule used by the integrator, the peak evaluator and
/// the spectrum sweep alike.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct DampingRatio(f64);

impl DampingRatio {
    /// Normalise a user-supplied damping value (fraction or percent).
    pub fn from_input(value: f64) -> Self {
        if value > 1.0 {
            Self(value / 100.0)
        } else {
            Self(value)
        }
    }

    /// Wrap a value already known to be a fraction.
    pub const fn from_fraction(fraction: f64) -> Self {
        Self(fraction)
    }

    pub const fn fraction(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }

    /// Underdamped and finite: the only range the closed-form recurrence covers.
    pub fn is_underdamped(self) -> bool {
        self.0.is_finite() && (0.0..1.0).contains(&self.0)
    }
}

impl From<f64> for DampingRatio {
    fn from(value: f64) -> Self {
        Self::from_input(value)
    }
}

/// Single oscillator configuration for a full-history integration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OscillatorParams {
    /// Natural period T (s)
    pub period: f64,
    pub damping: DampingRatio,
    /// Integration step (s)
    pub time_step: f64,
    /// Integration span (s)
    pub total_duration: f64,
}

impl OscillatorParams {
    pub fn new(period: f64, damping: impl Into<DampingRatio>, time_step: f64, total_duration: f64) -> Self {
        Self {
            period,
            damping: damping.into(),
            time_step,
            total_duration,
        }
    }

    /// Angular frequency w = 2π/T (rad/s).
    pub fn angular_frequency(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_is_normalised() {
        assert!((DampingRatio::from_input(5.0).fraction() - 0.05).abs() < 1e-15);
        assert_eq!(DampingRatio::from_input(0.05).fraction(), 0.05);
    }

    #[test]
    fn test_one_is_a_fraction() {
        // 1.0 is not > 1.0, so it stays critical damping
        assert_eq!(DampingRatio::from_input(1.0).fraction(), 1.0);
        assert!(!DampingRatio::from_input(1.0).is_underdamped());
    }

    #[test]
    fn test_underdamped_range() {
        assert!(DampingRatio::from_input(0.0).is_underdamped());
        assert!(DampingRatio::from_input(99.0).is_underdamped());
        assert!(!DampingRatio::from_input(-0.1).is_underdamped());
        assert!(!DampingRatio::from_input(f64::NAN).is_underdamped());
    }

    #[test]
    fn test_angular_frequency() {
        let p = OscillatorParams::new(0.5, 5.0, 0.02, 1.0);
        assert!((p.angular_frequency() - 4.0 * std::f64::consts::PI).abs() < 1e-12);
    }
}
