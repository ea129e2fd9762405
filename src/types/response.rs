//! Response histories, peak values and spectra

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DampingRatio, Series};

/// Response quantity tracked by the integrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResponseQuantity {
    /// Absolute acceleration
    Acceleration,
    /// Relative velocity
    Velocity,
    /// Relative displacement
    Displacement,
}

impl ResponseQuantity {
    pub const ALL: [Self; 3] = [Self::Acceleration, Self::Velocity, Self::Displacement];

    pub fn label(self) -> &'static str {
        match self {
            Self::Acceleration => "acceleration",
            Self::Velocity => "velocity",
            Self::Displacement => "displacement",
        }
    }
}

impl fmt::Display for ResponseQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResponseQuantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acceleration" | "acc" | "a" => Ok(Self::Acceleration),
            "velocity" | "vel" | "v" => Ok(Self::Velocity),
            "displacement" | "disp" | "u" => Ok(Self::Displacement),
            other => Err(format!("unknown response quantity '{other}'")),
        }
    }
}

// ============================================================================
// Time Histories
// ============================================================================

/// Full time histories from one integration, index-aligned with the excitation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResponseHistory {
    pub acceleration: Series,
    pub velocity: Series,
    pub displacement: Series,
}

impl ResponseHistory {
    /// All three histories reduced to the single point `(0, 0)`.
    pub fn zero_point() -> Self {
        Self {
            acceleration: Series::zero_point(),
            velocity: Series::zero_point(),
            displacement: Series::zero_point(),
        }
    }

    pub fn len(&self) -> usize {
        self.displacement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacement.is_empty()
    }

    pub fn series(&self, quantity: ResponseQuantity) -> &Series {
        match quantity {
            ResponseQuantity::Acceleration => &self.acceleration,
            ResponseQuantity::Velocity => &self.velocity,
            ResponseQuantity::Displacement => &self.displacement,
        }
    }

    /// Peak magnitudes of each history.
    pub fn peaks(&self) -> PeakResponse {
        PeakResponse {
            acceleration: self.acceleration.peak_magnitude(),
            velocity: self.velocity.peak_magnitude(),
            displacement: self.displacement.peak_magnitude(),
        }
    }
}

/// Largest magnitude reached by each response quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PeakResponse {
    pub acceleration: f64,
    pub velocity: f64,
    pub displacement: f64,
}

impl PeakResponse {
    pub fn get(&self, quantity: ResponseQuantity) -> f64 {
        match quantity {
            ResponseQuantity::Acceleration => self.acceleration,
            ResponseQuantity::Velocity => self.velocity,
            ResponseQuantity::Displacement => self.displacement,
        }
    }
}

// ============================================================================
// Response Spectrum
// ============================================================================

/// Period range and resolution for a spectrum sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpectrumRequest {
    pub damping: DampingRatio,
    /// Shortest oscillator period (s)
    pub min_period: f64,
    /// Longest oscillator period (s)
    pub max_period: f64,
    pub points: usize,
}

impl SpectrumRequest {
    pub fn new(damping: impl Into<DampingRatio>, min_period: f64, max_period: f64, points: usize) -> Self {
        Self {
            damping: damping.into(),
            min_period,
            max_period,
            points,
        }
    }
}

/// Peak response against oscillator period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Spectrum {
    pub acceleration: Series,
    pub velocity: Series,
    pub displacement: Series,
}

impl Spectrum {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_capacity(points: usize) -> Self {
        Self {
            acceleration: Series::with_capacity(points),
            velocity: Series::with_capacity(points),
            displacement: Series::with_capacity(points),
        }
    }

    pub fn len(&self) -> usize {
        self.acceleration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acceleration.is_empty()
    }

    /// Record the peaks for one oscillator period.
    pub fn push(&mut self, period: f64, peaks: PeakResponse) {
        self.acceleration.push(period, peaks.acceleration);
        self.velocity.push(period, peaks.velocity);
        self.displacement.push(period, peaks.displacement);
    }

    pub fn series(&self, quantity: ResponseQuantity) -> &Series {
        match quantity {
            ResponseQuantity::Acceleration => &self.acceleration,
            ResponseQuantity::Velocity => &self.velocity,
            ResponseQuantity::Displacement => &self.displacement,
        }
    }

    pub fn periods(&self) -> Vec<f64> {
        self.acceleration.abscissae()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_push_keeps_series_aligned() {
        let mut s = Spectrum::with_capacity(2);
        s.push(0.1, PeakResponse { acceleration: 1.0, velocity: 2.0, displacement: 3.0 });
        s.push(0.2, PeakResponse { acceleration: 4.0, velocity: 5.0, displacement: 6.0 });
        assert_eq!(s.len(), 2);
        assert_eq!(s.periods(), vec![0.1, 0.2]);
        assert_eq!(s.series(ResponseQuantity::Displacement).values(), vec![3.0, 6.0]);
    }

    #[test]
    fn test_quantity_parse() {
        assert_eq!("Velocity".parse::<ResponseQuantity>().unwrap(), ResponseQuantity::Velocity);
        assert!("jerk".parse::<ResponseQuantity>().is_err());
    }
}
