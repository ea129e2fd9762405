//! Response spectrum generation
//!
//! Sweeps the peak evaluator over oscillator periods spaced evenly on a log
//! scale in frequency:
//!
//! ```text
//! fmax = 1/min_period,  fmin = 1/max_period,  q = (fmax/fmin)^(1/N)
//! T_i  = 1 / (fmin · q^i),   i = 0 .. N-1
//! ```
//!
//! Each oscillator is integrated over the excitation plus
//! `SPECTRUM_TAIL_PERIODS · max_period` of free decay, so the longest-period
//! oscillators can reach their peak after the forcing stops.

use tracing::{debug, warn};

use super::integrator::{peak_of, SdofSystem};
use super::{guarded_point_count, is_positive};
use crate::config::defaults::{MAX_SERIES_POINTS, SPECTRUM_TAIL_PERIODS};
use crate::types::{OscillatorParams, Series, Spectrum, SpectrumRequest};

/// Oscillator periods for a sweep, in ascending order.
///
/// The formula produces periods from `max_period` downward; they are
/// returned reversed so the spectrum reads left to right. The first period
/// is `min_period · q` and the last is exactly `max_period`. Empty unless
/// `0 < min_period < max_period`.
pub fn spectrum_periods(min_period: f64, max_period: f64, points: usize) -> Vec<f64> {
    if points == 0 || !is_positive(min_period) || min_period >= max_period {
        return Vec::new();
    }
    let f_max = 1.0 / min_period;
    let f_min = 1.0 / max_period;
    let ratio = (f_max / f_min).powf(1.0 / points as f64);
    let mut periods: Vec<f64> = (0..points)
        .map(|i| 1.0 / (f_min * ratio.powi(i as i32)))
        .collect();
    periods.reverse();
    periods
}

/// Peak acceleration, velocity and displacement spectra of `excitation`.
///
/// The time step is read from the excitation's sampling. Returns an empty
/// spectrum, once and up front, when that step is not positive, the period
/// range is invalid, the damping is outside `[0, 1)` after normalisation, or
/// a single integration would exceed [`MAX_SERIES_POINTS`].
pub fn response_spectrum(excitation: &Series, request: &SpectrumRequest) -> Spectrum {
    let dt = excitation.step();
    if !is_positive(dt) {
        warn!(
            samples = excitation.len(),
            "Excitation has no usable time step, returning empty spectrum"
        );
        return Spectrum::empty();
    }
    if request.points == 0
        || !is_positive(request.min_period)
        || !is_positive(request.max_period)
        || request.min_period >= request.max_period
    {
        warn!(
            min_period = request.min_period,
            max_period = request.max_period,
            points = request.points,
            "Invalid spectrum period range, returning empty spectrum"
        );
        return Spectrum::empty();
    }
    if !request.damping.is_underdamped() {
        warn!(
            damping = request.damping.fraction(),
            "Damping outside [0, 1) after normalisation, returning empty spectrum"
        );
        return Spectrum::empty();
    }

    let last_time = excitation.last().map_or(0.0, |s| s.x);
    let total_duration = last_time + SPECTRUM_TAIL_PERIODS * request.max_period;
    if guarded_point_count(total_duration, dt).is_none() {
        warn!(
            total_duration,
            time_step = dt,
            max_points = MAX_SERIES_POINTS,
            "Spectrum integration would exceed the point ceiling, returning empty spectrum"
        );
        return Spectrum::empty();
    }

    let ground = excitation.values();
    let mut spectrum = Spectrum::with_capacity(request.points);
    for period in spectrum_periods(request.min_period, request.max_period, request.points) {
        let params = OscillatorParams {
            period,
            damping: request.damping,
            time_step: dt,
            total_duration,
        };
        let peaks = SdofSystem::prepare(&params)
            .map(|system| peak_of(&system, &ground))
            .unwrap_or_default();
        spectrum.push(period, peaks);
    }

    debug!(
        points = spectrum.len(),
        damping = request.damping.fraction(),
        total_duration,
        "Response spectrum complete"
    );
    spectrum
}
