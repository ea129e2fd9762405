//! Record file parser
//!
//! Turns raw text from an uploaded excitation file into a flat numeric array.
//! Three layouts share the same tokenizer:
//!
//! - **Accelerations**: one or more accelerations per row at a constant interval
//! - **Time/acceleration pairs**: `[time, acceleration]` per row, interleaved in the output
//! - **PEER NGA**: an unaltered strong-motion record; header lines are skipped
//!   and the data block is read as uniform-interval accelerations
//!
//! ## Line Rules
//! 1. A line with two or more consecutive letters is a header/comment and is dropped.
//! 2. Stray decimals such as `" .0123"` are rewritten to `"0.0123"`.
//! 3. The line is split on runs of whitespace, commas, semicolons and tabs.
//! 4. Empty tokens are dropped; the rest parse as `f64`. Tokens that still
//!    fail to parse become `NaN` and are counted in `malformed_tokens`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{2,}").expect("header pattern is a valid regex"));

static STRAY_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s,;])([-+]?)\.(\d)").expect("stray decimal pattern is a valid regex")
});

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("separator pattern is a valid regex"));

static PEER_NPTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNPTS\s*=\s*(\d+)").expect("NPTS pattern is a valid regex"));

static PEER_DT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDT\s*=\s*([0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")
        .expect("DT pattern is a valid regex")
});

/// Errors reading record files from disk
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Record {0} contains no numeric samples")]
    Empty(PathBuf),

    #[error("Time/acceleration file {path} has an odd number of values ({count})")]
    UnpairedValues { path: PathBuf, count: usize },
}

/// Layout of the numeric block in a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    Accelerations,
    TimeAccelerationPairs,
    PeerNga,
}

/// Sampling metadata found in a PEER NGA header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeerHeader {
    pub npts: Option<usize>,
    /// Declared sampling interval (s)
    pub dt: Option<f64>,
}

/// Output of the tokenizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRecord {
    /// Flat numeric array in file order
    pub values: Vec<f64>,
    /// Lines discarded as header/comment text
    pub header_lines: Vec<String>,
    /// Tokens that did not parse and were stored as `NaN`
    pub malformed_tokens: usize,
}

impl ParsedRecord {
    /// Scan the discarded header lines for PEER NGA `NPTS=` / `DT=` fields.
    pub fn peer_header(&self) -> Option<PeerHeader> {
        let mut header = PeerHeader::default();
        for line in &self.header_lines {
            if header.npts.is_none() {
                header.npts = PEER_NPTS
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok());
            }
            if header.dt.is_none() {
                header.dt = PEER_DT
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok());
            }
        }
        (header.npts.is_some() || header.dt.is_some()).then_some(header)
    }

    pub fn has_malformed(&self) -> bool {
        self.malformed_tokens > 0
    }
}

/// True when a line should be dropped as a header/comment.
pub fn is_header_line(line: &str) -> bool {
    HEADER_LINE.is_match(line)
}

/// Split one data line into numeric tokens. Unparseable tokens become `NaN`.
///
/// Returns the values and the number of malformed tokens.
pub fn tokenize_line(line: &str) -> (Vec<f64>, usize) {
    let repaired = STRAY_DECIMAL.replace_all(line, "${1}${2}0.${3}");
    let mut malformed = 0;
    let values = SEPARATORS
        .split(&repaired)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().unwrap_or_else(|_| {
                malformed += 1;
                f64::NAN
            })
        })
        .collect();
    (values, malformed)
}

/// Apply the line rules to a whole file's text.
pub fn parse_record_text(text: &str) -> ParsedRecord {
    let mut record = ParsedRecord::default();
    for line in text.lines() {
        if is_header_line(line) {
            record.header_lines.push(line.trim().to_string());
            continue;
        }
        let (values, malformed) = tokenize_line(line);
        record.values.extend(values);
        record.malformed_tokens += malformed;
    }
    if record.has_malformed() {
        warn!(
            malformed = record.malformed_tokens,
            total = record.values.len(),
            "Record contains tokens that are not numbers; stored as NaN"
        );
    }
    debug!(
        values = record.values.len(),
        header_lines = record.header_lines.len(),
        "Parsed record text"
    );
    record
}

/// Read and parse a record file, checking the layout-specific shape.
pub fn load_record_file(path: &Path, format: RecordFormat) -> Result<ParsedRecord, RecordError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| RecordError::Io(path.to_path_buf(), e))?;
    let record = parse_record_text(&text);

    if record.values.is_empty() {
        return Err(RecordError::Empty(path.to_path_buf()));
    }
    if format == RecordFormat::TimeAccelerationPairs && record.values.len() % 2 != 0 {
        return Err(RecordError::UnpairedValues {
            path: path.to_path_buf(),
            count: record.values.len(),
        });
    }
    if format == RecordFormat::PeerNga {
        if let Some(PeerHeader {
            npts: Some(npts), ..
        }) = record.peer_header()
        {
            if npts != record.values.len() {
                warn!(
                    path = %path.display(),
                    declared = npts,
                    found = record.values.len(),
                    "PEER header NPTS does not match the number of samples"
                );
            }
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("PEER NGA STRONG MOTION DATABASE RECORD"));
        assert!(is_header_line("time acc"));
        assert!(!is_header_line("1.0e-3 2.5E+01"));
        assert!(!is_header_line("  0.1, 0.2; 0.3"));
    }

    #[test]
    fn test_tokenize_mixed_separators() {
        let (values, malformed) = tokenize_line("0.1,0.2;\t0.3   0.4");
        assert_eq!(values, vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(malformed, 0);
    }

    #[test]
    fn test_tokenize_repairs_stray_decimal() {
        let (values, _) = tokenize_line("  .1234E-02 -.5000E-03 .25");
        assert_eq!(values.len(), 3);
        assert!((values[0] - 0.001234).abs() < 1e-15);
        assert!((values[1] + 0.0005).abs() < 1e-15);
        assert!((values[2] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_malformed_token_becomes_nan() {
        let (values, malformed) = tokenize_line("1.0 1..2 3.0");
        assert_eq!(malformed, 1);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 3.0);
    }

    #[test]
    fn test_parse_drops_header_lines() {
        let text = "Time Acceleration\n0.0 0.1\n0.01 0.2\n";
        let record = parse_record_text(text);
        assert_eq!(record.values, vec![0.0, 0.1, 0.01, 0.2]);
        assert_eq!(record.header_lines.len(), 1);
    }

    #[test]
    fn test_peer_header_fields() {
        let text = "PEER NGA STRONG MOTION DATABASE RECORD\n\
                    IMPERIAL VALLEY 10/15/79, EL CENTRO ARRAY, 140\n\
                    ACCELERATION TIME SERIES IN UNITS OF G\n\
                    NPTS=  4, DT=   .0050 SEC\n\
                    .1E-02 .2E-02 -.3E-02 .4E-02\n";
        let record = parse_record_text(text);
        assert_eq!(record.values.len(), 4);
        let header = record.peer_header().unwrap();
        assert_eq!(header.npts, Some(4));
        assert!((header.dt.unwrap() - 0.005).abs() < 1e-15);
    }

    #[test]
    fn test_no_peer_header_in_plain_file() {
        let record = parse_record_text("0.1\n0.2\n");
        assert!(record.peer_header().is_none());
    }
}
