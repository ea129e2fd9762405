//! sdof-response - SDOF oscillator response and response spectrum tool
//!
//! Synthesizes a ground-acceleration excitation, integrates a damped
//! single-degree-of-freedom oscillator against it, and sweeps the oscillator
//! period to build response spectra.
//!
//! # Usage
//!
//! ```bash
//! # List excitation families
//! sdof-response functions
//!
//! # Sine excitation, full response histories as CSV
//! sdof-response response --period 0.5 --damping 5
//!
//! # Spectrum of a PEER NGA record, JSON
//! sdof-response --format json spectrum --function peernga --file RSN6.AT2
//! ```
//!
//! # Environment Variables
//!
//! - `SDOF_CONFIG`: Path to the analysis TOML config
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use sdof_response::acquisition::{load_record_file, preset, GroundMotionRecord, RecordFormat};
use sdof_response::config::{self, AnalysisConfig};
use sdof_response::physics_engine::{integrate_series, response_spectrum, synthesize};
use sdof_response::report::{self, ReportFormat};
use sdof_response::types::{ExcitationKind, ExcitationSpec, ResponseQuantity};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sdof-response")]
#[command(about = "SDOF oscillator response and response spectrum engine")]
#[command(version)]
struct CliArgs {
    /// Analysis config TOML (overrides SDOF_CONFIG and ./sdof_config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    format: ReportFormat,

    /// Write output to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List the available excitation functions
    Functions,

    /// Synthesize the excitation series
    Excitation {
        #[command(flatten)]
        excitation: ExcitationArgs,
    },

    /// Integrate the oscillator and write its response histories
    Response {
        #[command(flatten)]
        excitation: ExcitationArgs,
        #[command(flatten)]
        oscillator: OscillatorArgs,
        /// Single quantity to write (default: all three)
        #[arg(long)]
        quantity: Option<ResponseQuantity>,
    },

    /// Sweep oscillator periods and write the response spectra
    Spectrum {
        #[command(flatten)]
        excitation: ExcitationArgs,
        #[command(flatten)]
        oscillator: OscillatorArgs,
        #[command(flatten)]
        spectrum: SpectrumArgs,
        /// Single quantity to write (default: all three)
        #[arg(long)]
        quantity: Option<ResponseQuantity>,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
struct ExcitationArgs {
    /// Excitation family (sine, saw, square, rampup, rampdn, acc, timeacc, peernga, preset)
    #[arg(long)]
    function: Option<ExcitationKind>,
    #[arg(long)]
    amplitude: Option<f64>,
    /// Period of the harmonic families (s)
    #[arg(long)]
    function_period: Option<f64>,
    /// Sampling interval (s)
    #[arg(long)]
    dt: Option<f64>,
    /// Duration over which the function is evaluated (s)
    #[arg(long)]
    excite_time: Option<f64>,
    /// Total series duration including the zero tail (s)
    #[arg(long)]
    total_time: Option<f64>,
    /// Multiplier applied to file and preset samples
    #[arg(long)]
    scale_factor: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    vshift: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    hshift: Option<f64>,
    /// Record file for the file-driven families
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Default)]
struct OscillatorArgs {
    /// Natural period (s)
    #[arg(long)]
    period: Option<f64>,
    /// Damping: a fraction, or a percentage when above 1
    #[arg(long)]
    damping: Option<f64>,
}

#[derive(clap::Args, Debug, Default)]
struct SpectrumArgs {
    #[arg(long)]
    min_period: Option<f64>,
    #[arg(long)]
    max_period: Option<f64>,
    #[arg(long)]
    points: Option<usize>,
}

// ============================================================================
// Overrides
// ============================================================================

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl ExcitationArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        let e = &mut config.excitation;
        set(&mut e.function, self.function);
        set(&mut e.amplitude, self.amplitude);
        set(&mut e.function_period, self.function_period);
        set(&mut e.time_step, self.dt);
        set(&mut e.excitation_duration, self.excite_time);
        set(&mut e.total_duration, self.total_time);
        set(&mut e.scale_factor, self.scale_factor);
        set(&mut e.vertical_shift, self.vshift);
        set(&mut e.horizontal_shift, self.hshift);
    }
}

impl OscillatorArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        set(&mut config.oscillator.period, self.period);
        set(&mut config.oscillator.damping, self.damping);
    }
}

impl SpectrumArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        set(&mut config.spectrum.min_period, self.min_period);
        set(&mut config.spectrum.max_period, self.max_period);
        set(&mut config.spectrum.points, self.points);
    }
}

// ============================================================================
// Startup
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::load()),
    }
}

/// Load the configured preset record. Returns whether a record was installed.
///
/// A preset that cannot be read is not fatal: the preset family then
/// synthesizes zeros from the empty record.
fn load_preset(config: &AnalysisConfig) -> bool {
    let Some(path) = &config.preset.path else {
        debug!("No preset record configured");
        return false;
    };
    match GroundMotionRecord::load(config.preset.name.clone(), path) {
        Ok(record) => {
            preset::init(record);
            true
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Preset record unavailable, preset excitation will be zero"
            );
            false
        }
    }
}

/// Parse the record file for a file-driven family and return its flat values.
///
/// A PEER header DT is adopted as the time step unless `--dt` was given.
fn load_procfile(
    config: &mut AnalysisConfig,
    file: Option<&Path>,
    dt_overridden: bool,
) -> Result<Vec<f64>> {
    let kind = config.excitation.function;
    let format = match kind {
        ExcitationKind::AccelerationFile => RecordFormat::Accelerations,
        ExcitationKind::TimeAccelerationFile => RecordFormat::TimeAccelerationPairs,
        ExcitationKind::StandardRecordFile => RecordFormat::PeerNga,
        _ => {
            if file.is_some() {
                warn!(function = %kind, "--file ignored for a function that does not read files");
            }
            return Ok(Vec::new());
        }
    };
    let Some(path) = file else {
        bail!("function '{kind}' needs a record file (--file)");
    };

    let record = load_record_file(path, format)
        .with_context(|| format!("Failed to read record file {}", path.display()))?;
    info!(
        path = %path.display(),
        values = record.values.len(),
        header_lines = record.header_lines.len(),
        "Record file parsed"
    );

    if format == RecordFormat::PeerNga {
        if let Some(header_dt) = record.peer_header().and_then(|h| h.dt) {
            let configured = config.excitation.time_step;
            if dt_overridden {
                if (header_dt - configured).abs() > 1e-9 {
                    warn!(header_dt, configured, "PEER header DT differs from --dt; using --dt");
                }
            } else {
                info!(header_dt, "Using time step from PEER header");
                config.excitation.time_step = header_dt;
            }
        }
    }
    Ok(record.values)
}

fn prepare_excitation(config: &mut AnalysisConfig, args: &ExcitationArgs) -> Result<ExcitationSpec> {
    args.apply(config);
    let procfile = load_procfile(config, args.file.as_deref(), args.dt.is_some())?;
    Ok(config.excitation.build(&procfile))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let mut analysis = load_config(args.config.as_deref())?;
    load_preset(&analysis);

    // Overrides are applied before the config is frozen, so every command
    // sees a single effective configuration.
    let spec = match &args.command {
        Command::Functions => None,
        Command::InitConfig { .. } => None,
        Command::Excitation { excitation } => Some(prepare_excitation(&mut analysis, excitation)?),
        Command::Response {
            excitation,
            oscillator,
            ..
        } => {
            oscillator.apply(&mut analysis);
            Some(prepare_excitation(&mut analysis, excitation)?)
        }
        Command::Spectrum {
            excitation,
            oscillator,
            spectrum,
            ..
        } => {
            oscillator.apply(&mut analysis);
            spectrum.apply(&mut analysis);
            Some(prepare_excitation(&mut analysis, excitation)?)
        }
    };
    config::init(analysis);
    let cfg = config::get();

    if let Command::InitConfig { path, force } = &args.command {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        cfg.save_to_file(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        return Ok(());
    }

    let mut out = open_output(args.output.as_deref())?;
    match (&args.command, spec) {
        (Command::Functions, _) => report::write_catalog(&mut out, args.format)?,
        (Command::Excitation { .. }, Some(spec)) => {
            let series = synthesize(&spec);
            info!(points = series.len(), function = %spec.function.kind(), "Excitation synthesized");
            report::write_series(&mut out, &series, "excitation", args.format)?;
        }
        (Command::Response { quantity, .. }, Some(spec)) => {
            let excitation = synthesize(&spec);
            let history = integrate_series(&cfg.oscillator_params(), &excitation);
            let peaks = history.peaks();
            info!(
                points = history.len(),
                peak_acceleration = peaks.acceleration,
                peak_velocity = peaks.velocity,
                peak_displacement = peaks.displacement,
                "Response integrated"
            );
            report::write_history(&mut out, &history, *quantity, args.format)?;
        }
        (Command::Spectrum { quantity, .. }, Some(spec)) => {
            let excitation = synthesize(&spec);
            let spectrum = response_spectrum(&excitation, &cfg.spectrum_request());
            info!(points = spectrum.len(), "Response spectrum computed");
            report::write_spectrum(&mut out, &spectrum, *quantity, args.format)?;
        }
        _ => {}
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_spectrum_overrides() {
        let args = CliArgs::parse_from([
            "sdof-response",
            "--format",
            "json",
            "spectrum",
            "--function",
            "saw",
            "--damping",
            "2",
            "--points",
            "20",
            "--quantity",
            "displacement",
        ]);
        assert_eq!(args.format, ReportFormat::Json);
        let Command::Spectrum {
            excitation,
            oscillator,
            spectrum,
            quantity,
        } = args.command
        else {
            panic!("expected spectrum command");
        };
        assert_eq!(excitation.function, Some(ExcitationKind::Sawtooth));
        assert_eq!(oscillator.damping, Some(2.0));
        assert_eq!(spectrum.points, Some(20));
        assert_eq!(quantity, Some(ResponseQuantity::Displacement));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = AnalysisConfig::default();
        let args = ExcitationArgs {
            amplitude: Some(3.0),
            vshift: Some(-1.0),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.excitation.amplitude, 3.0);
        assert_eq!(config.excitation.vertical_shift, -1.0);
        assert_eq!(config.excitation.time_step, 0.02);
    }

    #[test]
    fn test_file_family_without_file_is_an_error() {
        let mut config = AnalysisConfig::default();
        config.excitation.function = ExcitationKind::AccelerationFile;
        assert!(load_procfile(&mut config, None, false).is_err());
    }

    #[test]
    fn test_peer_header_dt_adopted_without_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.at2");
        std::fs::write(
            &path,
            "PEER NGA STRONG MOTION DATABASE RECORD\nNPTS=  4, DT= .0050 SEC\n 0.1 0.2\n 0.3 0.4\n",
        )
        .unwrap();

        let mut config = AnalysisConfig::default();
        config.excitation.function = ExcitationKind::StandardRecordFile;
        let values = load_procfile(&mut config, Some(path.as_path()), false).unwrap();
        assert_eq!(values, vec![0.1, 0.2, 0.3, 0.4]);
        assert!((config.excitation.time_step - 0.005).abs() < 1e-12);

        let mut config = AnalysisConfig::default();
        config.excitation.function = ExcitationKind::StandardRecordFile;
        load_procfile(&mut config, Some(path.as_path()), true).unwrap();
        assert_eq!(config.excitation.time_step, 0.02);
    }

    #[test]
    fn test_missing_preset_file_still_synthesizes_zeros() {
        let mut config = AnalysisConfig::default();
        config.preset.path = Some(PathBuf::from("/nonexistent/rec.txt"));
        assert!(!load_preset(&config));
        assert!(!preset::is_loaded());

        let args = ExcitationArgs {
            function: Some(ExcitationKind::PresetRecord),
            ..Default::default()
        };
        let spec = prepare_excitation(&mut config, &args).unwrap();
        let series = synthesize(&spec);
        assert!(series.len() > 1);
        assert!(series.samples().iter().all(|s| s.y == 0.0));
    }
}
