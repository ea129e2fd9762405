//! Excitation data acquisition module
//!
//! Handles ingestion of uploaded record files and the process-wide preset
//! ground-motion record.

pub mod preset;
pub mod record_parser;

pub use preset::GroundMotionRecord;
pub use record_parser::{
    load_record_file, parse_record_text, ParsedRecord, PeerHeader, RecordError, RecordFormat,
};
