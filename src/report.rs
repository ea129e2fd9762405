//! Tabular output for excitation series, response histories and spectra
//!
//! CSV is a header row followed by one row per sample, columns index-aligned.
//! JSON is the serde form of the same value, pretty-printed.

use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

use crate::types::{
    ExcitationKind, ResponseHistory, ResponseQuantity, Series, Spectrum,
};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output encoding for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

// ============================================================================
// CSV
// ============================================================================

/// Write `x` plus one column per series. Rows stop at the shortest series.
fn write_columns<W: Write>(
    writer: &mut W,
    x_label: &str,
    columns: &[(&str, &Series)],
) -> Result<(), ReportError> {
    let mut header = vec![x_label];
    header.extend(columns.iter().map(|(label, _)| *label));
    writeln!(writer, "{}", header.join(","))?;

    let rows = columns.iter().map(|(_, s)| s.len()).min().unwrap_or(0);
    let Some((_, abscissa)) = columns.first() else {
        return Ok(());
    };
    for i in 0..rows {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(abscissa.samples()[i].x.to_string());
        row.extend(columns.iter().map(|(_, s)| s.samples()[i].y.to_string()));
        writeln!(writer, "{}", row.join(","))?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

// ============================================================================
// Public Writers
// ============================================================================

/// Write a single excitation series as `time,<label>`.
pub fn write_series<W: Write>(
    writer: &mut W,
    series: &Series,
    label: &str,
    format: ReportFormat,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Csv => write_columns(writer, "time", &[(label, series)]),
        ReportFormat::Json => write_json(writer, series),
    }
}

/// Write a response history: one quantity, or all three when `quantity` is `None`.
pub fn write_history<W: Write>(
    writer: &mut W,
    history: &ResponseHistory,
    quantity: Option<ResponseQuantity>,
    format: ReportFormat,
) -> Result<(), ReportError> {
    match (format, quantity) {
        (ReportFormat::Csv, Some(q)) => write_columns(writer, "time", &[(q.label(), history.series(q))]),
        (ReportFormat::Csv, None) => write_columns(writer, "time", &all_columns(|q| history.series(q))),
        (ReportFormat::Json, Some(q)) => write_json(writer, history.series(q)),
        (ReportFormat::Json, None) => write_json(writer, history),
    }
}

/// Write a response spectrum keyed by oscillator period.
pub fn write_spectrum<W: Write>(
    writer: &mut W,
    spectrum: &Spectrum,
    quantity: Option<ResponseQuantity>,
    format: ReportFormat,
) -> Result<(), ReportError> {
    match (format, quantity) {
        (ReportFormat::Csv, Some(q)) => write_columns(writer, "period", &[(q.label(), spectrum.series(q))]),
        (ReportFormat::Csv, None) => write_columns(writer, "period", &all_columns(|q| spectrum.series(q))),
        (ReportFormat::Json, Some(q)) => write_json(writer, spectrum.series(q)),
        (ReportFormat::Json, None) => write_json(writer, spectrum),
    }
}

/// Write the excitation function catalog.
pub fn write_catalog<W: Write>(writer: &mut W, format: ReportFormat) -> Result<(), ReportError> {
    let catalog = ExcitationKind::catalog();
    match format {
        ReportFormat::Json => write_json(writer, catalog),
        ReportFormat::Csv => {
            writeln!(writer, "key,name,category,note")?;
            for info in catalog {
                writeln!(
                    writer,
                    "{},{},{},\"{}\"",
                    info.key,
                    info.full_name,
                    info.category,
                    info.note.replace('"', "\"\"")
                )?;
            }
            Ok(())
        }
    }
}

fn all_columns<'a>(series: impl Fn(ResponseQuantity) -> &'a Series) -> Vec<(&'static str, &'a Series)> {
    ResponseQuantity::ALL
        .iter()
        .map(|&q| (q.label(), series(q)))
        .collect()
}
