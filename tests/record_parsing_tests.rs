//! Record File Tests
//!
//! Loads excitation records from disk in each supported layout and feeds
//! them through the synthesizer.

use std::io::Write;

use sdof_response::acquisition::{load_record_file, RecordError, RecordFormat};
use sdof_response::{synthesize, ExcitationKind, ExcitationParams, GroundMotionRecord};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn acceleration_file_with_header_feeds_synthesizer() {
    let file = write_temp("Ground acceleration (g)\n .5, 1.0; 1.5\n2.0\n");
    let record = load_record_file(file.path(), RecordFormat::Accelerations).unwrap();
    assert_eq!(record.values, vec![0.5, 1.0, 1.5, 2.0]);
    assert_eq!(record.header_lines, vec!["Ground acceleration (g)".to_string()]);

    let spec = ExcitationParams {
        function: ExcitationKind::AccelerationFile,
        time_step: 0.01,
        excitation_duration: 0.055,
        total_duration: 0.055,
        scale_factor: 10.0,
        ..ExcitationParams::default()
    }
    .build(&record.values);
    // Six grid points, the last two fall past dt * (len - 1)
    let series = synthesize(&spec);
    assert_eq!(series.values(), vec![5.0, 10.0, 15.0, 20.0, 0.0, 0.0]);
}

#[test]
fn time_acceleration_file_must_be_paired() {
    let file = write_temp("0.0 0.1\n0.01 0.2\n0.02\n");
    let err = load_record_file(file.path(), RecordFormat::TimeAccelerationPairs).unwrap_err();
    assert!(matches!(err, RecordError::UnpairedValues { count: 5, .. }), "{err}");
}

#[test]
fn time_acceleration_file_interpolates() {
    let file = write_temp("time accel\n0.0 0.0\n0.1 1.0\n");
    let record = load_record_file(file.path(), RecordFormat::TimeAccelerationPairs).unwrap();
    let spec = ExcitationParams {
        function: ExcitationKind::TimeAccelerationFile,
        time_step: 0.025,
        excitation_duration: 0.09,
        total_duration: 0.09,
        scale_factor: 1.0,
        ..ExcitationParams::default()
    }
    .build(&record.values);
    let values = synthesize(&spec).values();
    assert_eq!(values.len(), 4);
    for (i, v) in values.iter().enumerate() {
        assert!((v - i as f64 * 0.25).abs() < 1e-12, "sample {i} = {v}");
    }
}

#[test]
fn empty_file_is_an_error() {
    let file = write_temp("Only a header line here\n\n");
    let err = load_record_file(file.path(), RecordFormat::Accelerations).unwrap_err();
    assert!(matches!(err, RecordError::Empty(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_record_file(&dir.path().join("absent.txt"), RecordFormat::PeerNga).unwrap_err();
    assert!(matches!(err, RecordError::Io(..)));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn peer_record_reads_header_and_samples() {
    let file = write_temp(
        "PEER NGA STRONG MOTION DATABASE RECORD\n\
         ACCELERATION TIME SERIES IN UNITS OF G\n\
         NPTS=    6, DT=   .0100 SEC\n\
         .1000E-01  .2000E-01 -.1000E-01\n\
         -.2000E-01  .0000E+00  .5000E-02\n",
    );
    let record = load_record_file(file.path(), RecordFormat::PeerNga).unwrap();
    assert_eq!(record.values.len(), 6);
    assert!((record.values[3] + 0.02).abs() < 1e-15);
    let header = record.peer_header().unwrap();
    assert_eq!(header.npts, Some(6));
    assert_eq!(header.dt, Some(0.01));
    assert!(!record.has_malformed());
}

#[test]
fn malformed_tokens_are_counted_not_fatal() {
    let file = write_temp("1.0 2..0 3.0\n");
    let record = load_record_file(file.path(), RecordFormat::Accelerations).unwrap();
    assert_eq!(record.malformed_tokens, 1);
    assert!(record.values[1].is_nan());
}

#[test]
fn ground_motion_record_loads_from_pairs() {
    let file = write_temp("time acc\n0.00 0.0\n0.02 0.3\n0.04 -0.2\n");
    let record = GroundMotionRecord::load("test record", file.path()).unwrap();
    assert_eq!(record.name, "test record");
    assert_eq!(record.len(), 3);
    assert!((record.time_step() - 0.02).abs() < 1e-12);
    assert_eq!(record.nearest(0.041), -0.2);
}
