//! Sample / Series types shared by the synthesizer, integrator and spectrum

use serde::{Deserialize, Serialize};

/// One point of a series: independent variable `x` (time or period) and value `y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered sequence of samples.
///
/// Time series produced by the engine have a constant step in `x`; spectra
/// use the oscillator period as `x` and are only monotonic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// The degenerate single-point series `{(0, 0)}` returned by soft guards.
    pub fn zero_point() -> Self {
        Self {
            samples: vec![Sample::new(0.0, 0.0)],
        }
    }

    /// Build a uniformly sampled series with `x = i * step`.
    pub fn from_values(step: f64, values: &[f64]) -> Self {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| Sample::new(i as f64 * step, y))
            .collect()
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.samples.push(Sample::new(x, y));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Dependent values only, in order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    /// Independent values only, in order.
    pub fn abscissae(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    /// Sampling interval inferred from the first two samples.
    ///
    /// Returns 0.0 for series with fewer than two samples, which the
    /// spectrum guard treats the same as a zero time step.
    pub fn step(&self) -> f64 {
        match self.samples.as_slice() {
            [first, second, ..] => second.x - first.x,
            _ => 0.0,
        }
    }

    /// Largest excursion in either direction: `max(max(y), |min(y)|)`.
    ///
    /// Returns 0.0 for an empty series.
    pub fn peak_magnitude(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let max = self.samples.iter().map(|s| s.y).fold(f64::NEG_INFINITY, f64::max);
        let min = self.samples.iter().map(|s| s.y).fold(f64::INFINITY, f64::min);
        max.max(min.abs())
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Series {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
