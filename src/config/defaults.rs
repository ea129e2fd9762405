//! System-wide default constants.
//!
//! Centralises the numerical guardrails and nominal values used by the
//! physics engine. Grouped by subsystem for easy discovery.

// ============================================================================
// Guardrails
// ============================================================================

/// Hard ceiling on the number of samples in any synthesized or integrated
/// series. Checked before any per-point storage is allocated.
pub const MAX_SERIES_POINTS: usize = 100_000;

// ============================================================================
// SDOF Integrator
// ============================================================================

/// Nominal oscillator mass (kg). Stiffness is derived as `k = w² · m`.
pub const NOMINAL_MASS: f64 = 1000.0;

// ============================================================================
// Excitation Synthesis
// ============================================================================

/// Phase distance (in function periods) within which a sawtooth sample is
/// treated as sitting on a cotangent pole.
pub const SAWTOOTH_POLE_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Response Spectrum
// ============================================================================

/// Free-decay padding after the excitation ends, in multiples of the
/// longest spectrum period.
///
/// `duration = last_excitation_time + SPECTRUM_TAIL_PERIODS * max_period`
pub const SPECTRUM_TAIL_PERIODS: f64 = 2.0;

/// Default shortest spectrum period (s).
pub const SPECTRUM_MIN_PERIOD: f64 = 0.05;

/// Default longest spectrum period (s).
pub const SPECTRUM_MAX_PERIOD: f64 = 4.0;

/// Default number of log-spaced spectrum points.
pub const SPECTRUM_POINTS: usize = 100;

// ============================================================================
// Oscillator
// ============================================================================

/// Default natural period (s).
pub const OSCILLATOR_PERIOD: f64 = 0.5;

/// Default damping, in percent of critical.
pub const OSCILLATOR_DAMPING_PERCENT: f64 = 5.0;
