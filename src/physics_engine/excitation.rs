//! Excitation synthesis
//!
//! Evaluates a tagged excitation function on a uniform time grid and pads
//! the result with a zero tail up to the total duration.
//!
//! Family equations, with `τ = t + horizontal_shift`:
//! - Sine: `A·sin(2π/P·τ) + v`
//! - Sawtooth: `−2A/π·atan(1/tan(τ·π/P)) + v`
//! - Square: `A·(2·⌊τ/P⌋ − ⌊2τ/P⌋ + 1) + v − A/2`
//! - Ramp up / down: `A·t/Te` / `A − A·t/Te` while `t ≤ Te`
//! - File and record families: scaled sample lookups, zero outside the data

use std::f64::consts::PI;
use tracing::{debug, warn};

use super::{guarded_point_count, is_positive};
use crate::acquisition::preset;
use crate::config::defaults::{MAX_SERIES_POINTS, SAWTOOTH_POLE_TOLERANCE};
use crate::types::{ExcitationFunction, ExcitationSpec, Harmonic, Series, TimeAccelerationRecord};

/// Synthesize the excitation series described by `spec`.
///
/// Returns the single-point series `{(0, 0)}` when the time step, the
/// excitation duration or (for periodic families) the function period is not
/// strictly positive, or when the series would exceed [`MAX_SERIES_POINTS`].
pub fn synthesize(spec: &ExcitationSpec) -> Series {
    let dt = spec.time_step;
    let period_ok = spec.function.period().map_or(true, is_positive);
    if !is_positive(dt) || !is_positive(spec.excitation_duration) || !period_ok {
        warn!(
            function = %spec.function.kind(),
            time_step = dt,
            excitation_duration = spec.excitation_duration,
            function_period = ?spec.function.period(),
            "Non-positive synthesis parameter, returning single zero sample"
        );
        return Series::zero_point();
    }

    let Some(excited) = guarded_point_count(spec.excitation_duration, dt) else {
        return ceiling_breach(spec);
    };
    let tail = if spec.total_duration > spec.excitation_duration {
        match guarded_point_count(spec.total_duration - spec.excitation_duration, dt) {
            Some(n) => n,
            None => return ceiling_breach(spec),
        }
    } else {
        0
    };
    let total = excited + tail;
    if total > MAX_SERIES_POINTS {
        return ceiling_breach(spec);
    }

    let mut series = Series::with_capacity(total);
    let mut non_finite = 0usize;
    for i in 0..excited {
        let t = i as f64 * dt;
        let mut y = evaluate_at(spec, t);
        if !y.is_finite() {
            non_finite += 1;
            y = 0.0;
        }
        series.push(t, y);
    }
    for i in excited..total {
        series.push(i as f64 * dt, 0.0);
    }

    if non_finite > 0 {
        warn!(
            function = %spec.function.kind(),
            count = non_finite,
            "Non-finite excitation samples replaced with zero"
        );
    }
    debug!(
        function = %spec.function.kind(),
        points = series.len(),
        excited,
        tail,
        "Excitation synthesized"
    );
    series
}

fn ceiling_breach(spec: &ExcitationSpec) -> Series {
    warn!(
        function = %spec.function.kind(),
        time_step = spec.time_step,
        total_duration = spec.total_duration,
        max_points = MAX_SERIES_POINTS,
        "Excitation would exceed the point ceiling, returning single zero sample"
    );
    Series::zero_point()
}

/// Value of the excitation at time `t` (before the zero tail is applied).
pub fn evaluate_at(spec: &ExcitationSpec, t: f64) -> f64 {
    let excite = spec.excitation_duration;
    match &spec.function {
        ExcitationFunction::Sine(h) => sine(h, t),
        ExcitationFunction::Sawtooth(h) => sawtooth(h, t),
        ExcitationFunction::Square(h) => square(h, t),
        ExcitationFunction::RampUp { amplitude } => {
            if t <= excite {
                amplitude * t / excite
            } else {
                0.0
            }
        }
        ExcitationFunction::RampDown { amplitude } => {
            if t <= excite {
                amplitude - amplitude * t / excite
            } else {
                0.0
            }
        }
        ExcitationFunction::AccelerationFile {
            samples,
            scale_factor,
        }
        | ExcitationFunction::StandardRecordFile {
            samples,
            scale_factor,
        } => scale_factor * uniform_lookup(samples, t, spec.time_step, excite),
        ExcitationFunction::TimeAccelerationFile {
            record,
            scale_factor,
        } => {
            if t > excite {
                0.0
            } else {
                scale_factor * interpolate(record, t)
            }
        }
        ExcitationFunction::PresetRecord { scale_factor } => {
            if t > excite {
                return 0.0;
            }
            scale_factor * preset::current_or_empty().nearest(t)
        }
    }
}

// ============================================================================
// Periodic Families
// ============================================================================

fn sine(h: &Harmonic, t: f64) -> f64 {
    h.amplitude * (2.0 * PI / h.period * (t + h.horizontal_shift)).sin() + h.vertical_shift
}

/// Rising saw from `−A` to `+A` over each period.
///
/// The cotangent form is undefined where `τ/P` is an integer; there the
/// right-hand limit `−A + v` is returned.
fn sawtooth(h: &Harmonic, t: f64) -> f64 {
    let cycles = (t + h.horizontal_shift) / h.period;
    let phase = cycles - cycles.floor();
    let at_pole = phase < SAWTOOTH_POLE_TOLERANCE || 1.0 - phase < SAWTOOTH_POLE_TOLERANCE;
    let floor_value = -h.amplitude + h.vertical_shift;
    if at_pole {
        return floor_value;
    }
    let value = -2.0 * h.amplitude / PI
        * (1.0 / ((t + h.horizontal_shift) * PI / h.period).tan()).atan()
        + h.vertical_shift;
    if value.is_finite() {
        value
    } else {
        floor_value
    }
}

/// Square wave of height `A` centred on the vertical shift.
fn square(h: &Harmonic, t: f64) -> f64 {
    let tau = t + h.horizontal_shift;
    h.amplitude * (2.0 * (tau / h.period).floor() - (2.0 * tau / h.period).floor() + 1.0)
        + h.vertical_shift
        - 0.5 * h.amplitude
}

// ============================================================================
// Sampled Families
// ============================================================================

/// Nearest-sample lookup into a uniformly sampled array.
///
/// Valid while `t <= excite` and `t <= dt·(len − 1)`; zero otherwise.
fn uniform_lookup(samples: &[f64], t: f64, dt: f64, excite: f64) -> f64 {
    if samples.is_empty() || t < 0.0 || t > excite || t > dt * (samples.len() - 1) as f64 {
        return 0.0;
    }
    let index = (t / dt).round() as usize;
    samples.get(index).copied().unwrap_or(0.0)
}

/// Linear interpolation between the two recorded samples bracketing `t`.
///
/// Zero outside `[first_time, last_time]`.
fn interpolate(record: &TimeAccelerationRecord, t: f64) -> f64 {
    let times = &record.times;
    let accs = &record.accelerations;
    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return 0.0;
    };
    if t < first || t > last {
        return 0.0;
    }

    // First index whose time is strictly after t
    let upper = times.partition_point(|&x| x <= t);
    if upper == 0 {
        return 0.0;
    }
    if upper == times.len() {
        return accs[upper - 1];
    }
    let (t1, t2) = (times[upper - 1], times[upper]);
    let (a1, a2) = (accs[upper - 1], accs[upper]);
    if t2 == t1 {
        return a1;
    }
    a1 + (a2 - a1) * (t - t1) / (t2 - t1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExcitationKind, ExcitationParams};

    fn params(function: ExcitationKind) -> ExcitationParams {
        ExcitationParams {
            function,
            amplitude: 10.0,
            function_period: 0.4,
            time_step: 0.02,
            excitation_duration: 5.0,
            total_duration: 5.0,
            vertical_shift: 0.0,
            horizontal_shift: 0.0,
            scale_factor: 1.0,
        }
    }

    #[test]
    fn test_sine_scenario() {
        let series = synthesize(&params(ExcitationKind::Sine).build(&[]));
        assert_eq!(series.len(), 250);
        assert_eq!(series.samples()[0].x, 0.0);
        assert!(series.samples()[0].y.abs() < 1e-12);
        let quarter = series.samples()[5];
        assert!((quarter.x - 0.1).abs() < 1e-12);
        assert!((quarter.y - 10.0).abs() < 1e-9, "got {}", quarter.y);
    }

    #[test]
    fn test_zero_tail_appended() {
        let mut p = params(ExcitationKind::Sine);
        p.total_duration = 15.0;
        let series = synthesize(&p.build(&[]));
        assert_eq!(series.len(), 750);
        assert!(series.samples()[250..].iter().all(|s| s.y == 0.0));
        assert!((series.step() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_ramp_up_values() {
        let spec = params(ExcitationKind::RampUp).build(&[]);
        assert!((evaluate_at(&spec, 2.5) - 5.0).abs() < 1e-12);
        assert_eq!(evaluate_at(&spec, 6.0), 0.0);
    }

    #[test]
    fn test_ramp_down_values() {
        let spec = params(ExcitationKind::RampDown).build(&[]);
        assert!((evaluate_at(&spec, 0.0) - 10.0).abs() < 1e-12);
        assert!((evaluate_at(&spec, 2.5) - 5.0).abs() < 1e-12);
        assert_eq!(evaluate_at(&spec, 5.5), 0.0);
    }

    #[test]
    fn test_square_levels() {
        let spec = params(ExcitationKind::Square).build(&[]);
        // First half period sits at +A/2, second half at -A/2
        assert!((evaluate_at(&spec, 0.1) - 5.0).abs() < 1e-12);
        assert!((evaluate_at(&spec, 0.3) + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_shifts_move_sine_and_square() {
        let mut p = params(ExcitationKind::Sine);
        p.horizontal_shift = 0.1;
        p.vertical_shift = 2.0;
        let spec = p.build(&[]);
        // A quarter-period lead puts the crest at t = 0
        assert!((evaluate_at(&spec, 0.0) - 12.0).abs() < 1e-9);
        assert!((evaluate_at(&spec, 0.2) + 8.0).abs() < 1e-9);

        let mut p = params(ExcitationKind::Square);
        p.horizontal_shift = 0.2;
        p.vertical_shift = 1.0;
        let spec = p.build(&[]);
        assert!((evaluate_at(&spec, 0.1) + 4.0).abs() < 1e-12);
        assert!((evaluate_at(&spec, 0.25) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_sawtooth_is_finite_at_poles() {
        let spec = params(ExcitationKind::Sawtooth).build(&[]);
        let series = synthesize(&spec);
        assert!(series.iter().all(|s| s.y.is_finite()));
        assert_eq!(evaluate_at(&spec, 0.0), -10.0);
        assert_eq!(evaluate_at(&spec, 0.4), -10.0);
        // Mid-period crosses zero
        assert!(evaluate_at(&spec, 0.2).abs() < 1e-9);
        // Rising ramp
        assert!(evaluate_at(&spec, 0.1) < evaluate_at(&spec, 0.3));
    }

    #[test]
    fn test_non_positive_step_degenerates() {
        let mut p = params(ExcitationKind::Sine);
        p.time_step = 0.0;
        assert_eq!(synthesize(&p.build(&[])), Series::zero_point());
        p.time_step = -0.02;
        assert_eq!(synthesize(&p.build(&[])), Series::zero_point());
    }

    #[test]
    fn test_non_positive_function_period_degenerates() {
        let mut p = params(ExcitationKind::Sine);
        p.function_period = 0.0;
        assert_eq!(synthesize(&p.build(&[])), Series::zero_point());
    }

    #[test]
    fn test_point_ceiling_degenerates() {
        let mut p = params(ExcitationKind::Sine);
        p.time_step = 1e-5;
        assert_eq!(synthesize(&p.build(&[])), Series::zero_point());
    }

    #[test]
    fn test_acceleration_file_lookup() {
        let mut p = params(ExcitationKind::AccelerationFile);
        p.scale_factor = 2.0;
        p.excitation_duration = 0.1;
        p.total_duration = 0.1;
        let series = synthesize(&p.build(&[1.0, 2.0, 3.0]));
        assert_eq!(series.len(), 5);
        assert_eq!(series.values(), vec![2.0, 4.0, 6.0, 0.0, 0.0]);
    }

    #[test]
    fn test_time_acceleration_interpolation() {
        let mut p = params(ExcitationKind::TimeAccelerationFile);
        p.scale_factor = 1.0;
        let spec = p.build(&[0.0, 0.0, 0.1, 1.0, 0.3, -1.0]);
        assert!((evaluate_at(&spec, 0.05) - 0.5).abs() < 1e-12);
        assert!((evaluate_at(&spec, 0.1) - 1.0).abs() < 1e-12);
        assert!((evaluate_at(&spec, 0.2) - 0.0).abs() < 1e-12);
        assert!((evaluate_at(&spec, 0.3) + 1.0).abs() < 1e-12);
        assert_eq!(evaluate_at(&spec, 0.31), 0.0);
    }

    #[test]
    fn test_nan_samples_are_zeroed() {
        let mut p = params(ExcitationKind::AccelerationFile);
        p.excitation_duration = 0.06;
        p.total_duration = 0.06;
        let series = synthesize(&p.build(&[1.0, f64::NAN, 3.0]));
        assert_eq!(series.values(), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_preset_without_record_is_zero() {
        let spec = params(ExcitationKind::PresetRecord).build(&[]);
        if !preset::is_loaded() {
            let series = synthesize(&spec);
            assert_eq!(series.len(), 250);
            assert!(series.iter().all(|s| s.y == 0.0));
        }
    }
}
