//! sdof-response: SDOF Oscillator Response & Response Spectrum Engine
//!
//! Computes the dynamic response of a damped single-degree-of-freedom
//! oscillator to a ground-acceleration time series, and the peak-response
//! spectra obtained by sweeping the oscillator period.
//!
//! ## Architecture
//!
//! - **Types**: series, excitation families, oscillator parameters, results
//! - **Physics Engine**: excitation synthesis, exact recurrence integrator, spectrum sweep
//! - **Acquisition**: record file parsing and the once-loaded preset record
//! - **Config**: TOML defaults with unknown-key and range validation
//! - **Report**: CSV / JSON writers

pub mod acquisition;
pub mod config;
pub mod physics_engine;
pub mod report;
pub mod types;

// Re-export analysis configuration
pub use config::AnalysisConfig;

// Re-export commonly used types
pub use types::{
    DampingRatio, ExcitationFunction, ExcitationKind, ExcitationParams, ExcitationSpec,
    OscillatorParams, PeakResponse, ResponseHistory, ResponseQuantity, Sample, Series, Spectrum,
    SpectrumRequest,
};

// Re-export the numerical pipeline
pub use physics_engine::{
    integrate, integrate_series, peak_response, response_spectrum, spectrum_periods, synthesize,
};

// Re-export acquisition
pub use acquisition::{GroundMotionRecord, RecordError, RecordFormat};
