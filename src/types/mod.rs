//! Shared data structures for excitation synthesis and SDOF analysis
//!
//! - `Series` / `Sample`: uniformly (or period-) indexed value sequences
//! - `ExcitationSpec`: tagged excitation function plus sampling parameters
//! - `OscillatorParams` / `DampingRatio`: the oscillator being analysed
//! - `ResponseHistory` / `Spectrum`: engine outputs

mod excitation;
mod oscillator;
mod response;
mod series;

pub use excitation::*;
pub use oscillator::*;
pub use response::*;
pub use series::*;
