//! Preset record lifecycle
//!
//! Kept in its own test binary: the preset is process-wide and can only be
//! installed once.

use sdof_response::acquisition::preset;
use sdof_response::{synthesize, ExcitationKind, ExcitationParams, GroundMotionRecord};

#[test]
fn preset_excitation_is_zero_until_loaded_then_fixed() {
    let spec = ExcitationParams {
        function: ExcitationKind::PresetRecord,
        scale_factor: 2.0,
        time_step: 0.01,
        excitation_duration: 0.025,
        total_duration: 0.025,
        ..ExcitationParams::default()
    }
    .build(&[]);

    assert!(!preset::is_loaded());
    assert!(preset::get().is_none());
    assert_eq!(synthesize(&spec).values(), vec![0.0, 0.0, 0.0]);

    preset::init(GroundMotionRecord::from_interleaved(
        "unit",
        &[0.0, 1.0, 0.01, 2.0, 0.02, 3.0],
    ));
    assert!(preset::is_loaded());
    assert_eq!(synthesize(&spec).values(), vec![2.0, 4.0, 6.0]);

    // Second install is ignored
    preset::init(GroundMotionRecord::from_interleaved("other", &[0.0, 9.0, 0.01, 9.0]));
    assert_eq!(preset::current_or_empty().name, "unit");
    assert_eq!(synthesize(&spec).values(), vec![2.0, 4.0, 6.0]);
}
