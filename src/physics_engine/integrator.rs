//! SDOF time-stepping integrator
//!
//! Exact recurrence for a linear, viscously damped single-degree-of-freedom
//! oscillator under base acceleration that varies linearly between samples:
//!
//! ```text
//! u[i+1] = A·u[i]  + B·v[i]  + C·ag[i]  + D·ag[i+1]
//! v[i+1] = A'·u[i] + B'·v[i] + C'·ag[i] + D'·ag[i+1]
//! a[i+1] = −ag[i+1] − 2ζw·v[i+1] − k·u[i+1]/m
//! ```
//!
//! The coefficients depend only on `w`, `ζ` and `dt`, so they are computed
//! once per oscillator. One step loop drives a [`ResponseSink`]: the full
//! history collector and the peak tracker see identical per-step values.

use tracing::{debug, warn};

use super::{guarded_point_count, is_positive};
use crate::config::defaults::NOMINAL_MASS;
use crate::types::{OscillatorParams, PeakResponse, ResponseHistory, Series};

// ============================================================================
// Recurrence Coefficients
// ============================================================================

/// Per-step update weights for displacement (A..D) and velocity (Ap..Dp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurrenceCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub ap: f64,
    pub bp: f64,
    pub cp: f64,
    pub dp: f64,
}

impl RecurrenceCoefficients {
    /// Coefficients for angular frequency `w`, damping fraction `zeta` and step `dt`.
    ///
    /// Requires `0 <= zeta < 1`, `w > 0`, `dt > 0`.
    pub fn new(w: f64, zeta: f64, dt: f64) -> Self {
        let root = (1.0 - zeta * zeta).sqrt();
        let wd = w * root;
        let e = (-zeta * w * dt).exp();
        let s = (wd * dt).sin();
        let c = (wd * dt).cos();
        let w2 = w * w;

        Self {
            a: e * (zeta / root * s + c),
            b: e * (1.0 / wd * s),
            c: -1.0 / w2
                * (2.0 * zeta / (w * dt)
                    + e * (((1.0 - 2.0 * zeta * zeta) / (wd * dt) - zeta / root) * s
                        - (1.0 + 2.0 * zeta / (w * dt)) * c)),
            d: -1.0 / w2
                * (1.0 - 2.0 * zeta / (w * dt)
                    + e * ((2.0 * zeta * zeta - 1.0) / (wd * dt) * s + 2.0 * zeta / (w * dt) * c)),
            ap: -e * (w / root * s),
            bp: e * (c - zeta / root * s),
            cp: -1.0 / w2 * (-1.0 / dt + e * ((w / root + zeta / (dt * root)) * s + 1.0 / dt * c)),
            dp: -1.0 / (w2 * dt) * (1.0 - e * (zeta / root * s + c)),
        }
    }
}

// ============================================================================
// Oscillator
// ============================================================================

/// Oscillator state at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResponseState {
    /// Relative displacement
    pub displacement: f64,
    /// Relative velocity
    pub velocity: f64,
    /// Absolute acceleration
    pub acceleration: f64,
}

/// Prepared oscillator: derived constants plus the point count to integrate.
#[derive(Debug, Clone, Copy)]
pub struct SdofSystem {
    pub w: f64,
    pub zeta: f64,
    pub stiffness: f64,
    pub mass: f64,
    pub time_step: f64,
    pub points: usize,
    pub coefficients: RecurrenceCoefficients,
}

impl SdofSystem {
    /// Validate parameters and precompute constants.
    ///
    /// Returns `None` (after logging) when the step is not positive, the
    /// period is not positive, the damping is outside `[0, 1)` after
    /// percentage normalisation, or the point count is zero or over the ceiling.
    pub fn prepare(params: &OscillatorParams) -> Option<Self> {
        let dt = params.time_step;
        if !is_positive(dt) || !is_positive(params.period) {
            warn!(
                period = params.period,
                time_step = dt,
                "Non-positive oscillator period or time step, returning single zero sample"
            );
            return None;
        }
        if !params.damping.is_underdamped() {
            warn!(
                damping = params.damping.fraction(),
                "Damping outside [0, 1) after normalisation, returning single zero sample"
            );
            return None;
        }
        let Some(points) = guarded_point_count(params.total_duration, dt) else {
            warn!(
                total_duration = params.total_duration,
                time_step = dt,
                "Integration would exceed the point ceiling, returning single zero sample"
            );
            return None;
        };
        if points == 0 {
            return None;
        }

        let w = params.angular_frequency();
        let zeta = params.damping.fraction();
        let mass = NOMINAL_MASS;
        Some(Self {
            w,
            zeta,
            stiffness: w * w * mass,
            mass,
            time_step: dt,
            points,
            coefficients: RecurrenceCoefficients::new(w, zeta, dt),
        })
    }

    /// Absolute acceleration from the equation of motion.
    fn acceleration(&self, ground: f64, velocity: f64, displacement: f64) -> f64 {
        let restoring = self.stiffness * displacement;
        -ground - 2.0 * self.zeta * self.w * velocity - restoring / self.mass
    }

    /// March the recurrence over `self.points` samples, feeding each state to `sink`.
    ///
    /// Excitation samples past the end of `excitation` are taken as zero.
    pub fn run<S: ResponseSink>(&self, excitation: &[f64], sink: &mut S) {
        let ground = |i: usize| excitation.get(i).copied().unwrap_or(0.0);
        let k = &self.coefficients;

        let mut state = ResponseState {
            displacement: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
        };
        state.acceleration = self.acceleration(ground(0), state.velocity, state.displacement);
        sink.record(0, 0.0, state);

        for i in 0..self.points - 1 {
            let ag_i = ground(i);
            let ag_next = ground(i + 1);
            let u = state.displacement;
            let v = state.velocity;

            let displacement = k.a * u + k.b * v + k.c * ag_i + k.d * ag_next;
            let velocity = k.ap * u + k.bp * v + k.cp * ag_i + k.dp * ag_next;
            state = ResponseState {
                displacement,
                velocity,
                acceleration: self.acceleration(ag_next, velocity, displacement),
            };
            sink.record(i + 1, (i + 1) as f64 * self.time_step, state);
        }
    }
}

// ============================================================================
// Accumulators
// ============================================================================

/// Receives the oscillator state at every sample, in index order.
pub trait ResponseSink {
    fn record(&mut self, index: usize, time: f64, state: ResponseState);
}

/// Collects full time histories.
#[derive(Debug, Default)]
pub struct HistorySink {
    history: ResponseHistory,
}

impl HistorySink {
    pub fn with_capacity(points: usize) -> Self {
        Self {
            history: ResponseHistory {
                acceleration: Series::with_capacity(points),
                velocity: Series::with_capacity(points),
                displacement: Series::with_capacity(points),
            },
        }
    }

    pub fn into_history(self) -> ResponseHistory {
        self.history
    }
}

impl ResponseSink for HistorySink {
    fn record(&mut self, _index: usize, time: f64, state: ResponseState) {
        self.history.displacement.push(time, state.displacement);
        self.history.velocity.push(time, state.velocity);
        self.history.acceleration.push(time, state.acceleration);
    }
}

/// Tracks running peak magnitudes only.
#[derive(Debug, Default)]
pub struct PeakSink {
    peaks: PeakResponse,
}

impl PeakSink {
    pub fn peaks(&self) -> PeakResponse {
        self.peaks
    }
}

impl ResponseSink for PeakSink {
    fn record(&mut self, _index: usize, _time: f64, state: ResponseState) {
        self.peaks.displacement = self.peaks.displacement.max(state.displacement.abs());
        self.peaks.velocity = self.peaks.velocity.max(state.velocity.abs());
        self.peaks.acceleration = self.peaks.acceleration.max(state.acceleration.abs());
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Full response histories for one oscillator.
///
/// Degenerate inputs yield [`ResponseHistory::zero_point`].
pub fn integrate(params: &OscillatorParams, excitation: &[f64]) -> ResponseHistory {
    let Some(system) = SdofSystem::prepare(params) else {
        return ResponseHistory::zero_point();
    };
    let mut sink = HistorySink::with_capacity(system.points);
    system.run(excitation, &mut sink);
    debug!(
        period = params.period,
        damping = system.zeta,
        points = system.points,
        "SDOF integration complete"
    );
    sink.into_history()
}

/// Convenience wrapper taking the excitation as a series.
pub fn integrate_series(params: &OscillatorParams, excitation: &Series) -> ResponseHistory {
    integrate(params, &excitation.values())
}

/// Peak magnitudes without retaining histories.
///
/// Degenerate inputs yield all-zero peaks, matching the single zero sample
/// returned by [`integrate`].
pub fn peak_response(params: &OscillatorParams, excitation: &[f64]) -> PeakResponse {
    match SdofSystem::prepare(params) {
        Some(system) => peak_of(&system, excitation),
        None => PeakResponse::default(),
    }
}

pub(crate) fn peak_of(system: &SdofSystem, excitation: &[f64]) -> PeakResponse {
    let mut sink = PeakSink::default();
    system.run(excitation, &mut sink);
    sink.peaks()
}
