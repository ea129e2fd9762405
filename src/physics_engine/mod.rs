//! Physics Engine Module
//!
//! Deterministic numerical core for single-degree-of-freedom analysis.
//! Every function here is pure: explicit inputs in, freshly built values out.
//!
//! ## Pipeline
//! - `synthesize()` - Excitation series from a tagged function family
//! - `integrate()` - Full response histories via the exact piecewise-linear recurrence
//! - `peak_response()` - Same recurrence, peaks only
//! - `response_spectrum()` - Peak sweep over log-spaced oscillator periods
//!
//! ## Soft Guards
//! Invalid inputs never produce an error. Non-positive steps or durations and
//! requests above [`MAX_SERIES_POINTS`] return a degenerate but well-formed
//! result (a single zero sample, or an empty spectrum).

pub mod excitation;
pub mod integrator;
pub mod spectrum;

pub use excitation::{evaluate_at, synthesize};
pub use integrator::{
    integrate, integrate_series, peak_response, HistorySink, PeakSink, RecurrenceCoefficients,
    ResponseSink, ResponseState, SdofSystem,
};
pub use spectrum::{response_spectrum, spectrum_periods};

pub use crate::config::defaults::MAX_SERIES_POINTS;

/// True for finite, strictly positive values.
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Number of samples `ceil(duration / step)` for a span, or `None` when the
/// step is unusable or the count would exceed [`MAX_SERIES_POINTS`].
///
/// A non-positive duration yields `Some(0)`.
pub fn guarded_point_count(duration: f64, step: f64) -> Option<usize> {
    if !is_positive(step) || !duration.is_finite() {
        return None;
    }
    let count = (duration / step).ceil();
    if count <= 0.0 {
        return Some(0);
    }
    if count > MAX_SERIES_POINTS as f64 {
        return None;
    }
    Some(count as usize)
}
