//! FireCalc CLI - fire-alarm circuit evaluation from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use firecalc::{
    CircuitEngine, CircuitReport, CircuitStatus, CurrentEstimate, Device, DeviceCatalog,
    EvaluationOptions, Project, WirepathFill,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Device-spec file looked up beside the project when `--specs` is omitted.
const DEFAULT_SPECS_FILE: &str = "device_specs.json";

#[derive(Parser)]
#[command(name = "firecalc")]
#[command(about = "Fire-alarm circuit voltage drop, battery and conduit fill calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every main-panel circuit and wirepath of a project file
    Evaluate {
        /// Path to project JSON file
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Device-spec table (defaults to device_specs.json beside the project)
        #[arg(long, value_name = "FILE")]
        specs: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if circuits reach this status or worse
        #[arg(long, value_enum)]
        fail_on: Option<FailOn>,

        /// Standby period in hours
        #[arg(long, value_name = "H")]
        standby_hours: Option<f64>,

        /// Alarm period in minutes
        #[arg(long, value_name = "M")]
        alarm_minutes: Option<f64>,

        /// Show wirepath bundles without the fill percentage
        #[arg(long)]
        hide_fill: bool,
    },

    /// Check conduit fill for one wire bundle
    Fill {
        /// Conduit kind
        #[arg(long, default_value = "EMT")]
        kind: String,

        /// Trade size, e.g. 3/4 or 1-1/4
        #[arg(long)]
        size: String,

        /// Conductors as AWG:COUNT, repeatable (e.g. --wire 18:10 --wire 12:2)
        #[arg(long = "wire", value_name = "AWG:COUNT", value_parser = parse_wire_count, required = true)]
        wires: Vec<(u32, i64)>,

        /// Show the bundle without the fill percentage
        #[arg(long)]
        hide_fill: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Estimate one device's standby and alarm current
    Device {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        part: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        candela: Option<f64>,

        /// Device-spec table
        #[arg(long, value_name = "FILE")]
        specs: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOn {
    /// Fail on WARN or FAIL circuits
    Warn,
    /// Fail on FAIL circuits or overfilled conduit
    Fail,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Evaluate {
            project,
            specs,
            format,
            fail_on,
            standby_hours,
            alarm_minutes,
            hide_fill,
        } => handle_evaluate(
            &project,
            specs.as_deref(),
            &format,
            fail_on,
            OptionOverrides {
                standby_hours,
                alarm_minutes,
                hide_fill,
            },
        ),
        Commands::Fill {
            kind,
            size,
            wires,
            hide_fill,
            format,
        } => handle_fill(&kind, &size, &wires, hide_fill, &format),
        Commands::Device {
            name,
            part,
            model,
            candela,
            specs,
            format,
        } => handle_device(
            device_from_args(name, part, model, candela),
            specs.as_deref(),
            &format,
        ),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `18:10` -> (18, 10). The gauge accepts the same spellings as project files.
fn parse_wire_count(raw: &str) -> Result<(u32, i64), String> {
    let (gauge, count) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected AWG:COUNT, got {:?}", raw))?;
    let awg = firecalc::lenient::parse_awg(gauge)
        .ok_or_else(|| format!("invalid wire gauge {:?}", gauge))?;
    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid wire count {:?}", count))?;
    Ok((awg, count))
}

struct OptionOverrides {
    standby_hours: Option<f64>,
    alarm_minutes: Option<f64>,
    hide_fill: bool,
}

impl OptionOverrides {
    fn apply(&self, mut options: EvaluationOptions) -> EvaluationOptions {
        if let Some(hours) = self.standby_hours {
            options.standby_hours = hours;
        }
        if let Some(minutes) = self.alarm_minutes {
            options.alarm_minutes = minutes;
        }
        if self.hide_fill {
            options.hide_conduit_fill = true;
        }
        options
    }
}

fn load_catalog(specs: Option<&Path>, project: Option<&Path>) -> Arc<DeviceCatalog> {
    let path = match (specs, project) {
        (Some(specs), _) => specs.to_path_buf(),
        (None, Some(project)) => project.with_file_name(DEFAULT_SPECS_FILE),
        (None, None) => return Arc::new(DeviceCatalog::empty()),
    };
    if specs.is_none() && !path.exists() {
        tracing::debug!("No device spec table at {:?}", path);
        return Arc::new(DeviceCatalog::empty());
    }
    Arc::new(DeviceCatalog::load(&path))
}

fn handle_evaluate(
    project_path: &Path,
    specs: Option<&Path>,
    format: &OutputFormat,
    fail_on: Option<FailOn>,
    overrides: OptionOverrides,
) -> Result<i32> {
    let project: Project = Project::load(project_path)
        .with_context(|| format!("failed to load project {}", project_path.display()))?;

    let options = overrides.apply(project.options.clone().unwrap_or_default());
    let engine = CircuitEngine::with_catalog(load_catalog(specs, Some(project_path)))
        .with_options(options);

    let report = engine
        .evaluate_project(&project)
        .context("wirepath check failed")?;

    match format {
        OutputFormat::Human => output_report_human(project_path, &report),
        OutputFormat::Json => print_json(&report)?,
    }

    let failed = match fail_on {
        Some(FailOn::Warn) => report.has_warnings_or_failures(),
        Some(FailOn::Fail) => report.has_failures(),
        None => false,
    };
    Ok(if failed { 1 } else { 0 })
}

fn handle_fill(
    kind: &str,
    size: &str,
    wires: &[(u32, i64)],
    hide_fill: bool,
    format: &OutputFormat,
) -> Result<i32> {
    let mut bundle: BTreeMap<u32, i64> = BTreeMap::new();
    for (awg, count) in wires {
        *bundle.entry(*awg).or_insert(0) += count;
    }

    let options = EvaluationOptions {
        hide_conduit_fill: hide_fill,
        ..Default::default()
    };
    let fill = CircuitEngine::new()
        .with_options(options)
        .check_wirepath(kind, size, &bundle)?;

    match format {
        OutputFormat::Human => output_fill_human(&fill),
        OutputFormat::Json => print_json(&fill)?,
    }
    Ok(if fill.compliant { 0 } else { 1 })
}

fn device_from_args(
    name: Option<String>,
    part: Option<String>,
    model: Option<String>,
    candela: Option<f64>,
) -> Device {
    Device {
        name: name.unwrap_or_default(),
        part_number: part.unwrap_or_default(),
        model: model.unwrap_or_default(),
        candela,
        ..Default::default()
    }
}

fn handle_device(device: Device, specs: Option<&Path>, format: &OutputFormat) -> Result<i32> {
    if device.name.is_empty()
        && device.part_number.is_empty()
        && device.model.is_empty()
        && device.candela.is_none()
    {
        bail!("describe the device with at least one of --name, --part, --model or --candela");
    }

    let engine = CircuitEngine::with_catalog(load_catalog(specs, None));
    let estimate = engine.resolver().resolve(&device);

    match format {
        OutputFormat::Human => output_device_human(&estimate),
        OutputFormat::Json => print_json(&estimate)?,
    }
    Ok(0)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", output);
    Ok(())
}

fn status_marker(status: CircuitStatus) -> &'static str {
    match status {
        CircuitStatus::Pass => "  ",
        CircuitStatus::Warn => "! ",
        CircuitStatus::Fail => "x ",
    }
}

fn output_report_human(project_path: &Path, report: &CircuitReport) {
    println!("\nProject: {}", project_path.display());
    println!("{}", "─".repeat(60));

    if report.rows.is_empty() {
        println!("  No main-panel circuits found");
    }

    let mut current_panel: Option<&str> = None;
    for row in &report.rows {
        if current_panel != Some(row.panel.as_str()) {
            println!("\n  {}:", row.panel);
            current_panel = Some(row.panel.as_str());
        }
        println!(
            "  {}{:<8} {:<5} {:>3} dev  {:>7.1} ft @ {:>2} AWG  {:>6.3} A  VD {:>5.2}%  {:>6.3} Ah  {}",
            status_marker(row.status),
            row.circuit_id,
            row.circuit_type.as_str(),
            row.device_count,
            row.length_ft,
            row.gauge,
            row.current_a,
            row.voltage_drop_pct,
            row.battery_ah,
            row.status
        );
    }

    if !report.wirepaths.is_empty() {
        println!("\n  Wirepaths:");
        for wirepath in &report.wirepaths {
            output_wirepath_line(wirepath);
        }
    }

    println!("\n  Battery:");
    for (panel, ah) in report.battery_ah_by_panel() {
        println!("    {}: {:.2} Ah", panel, ah);
    }

    println!("\n  Summary:");
    println!("    Pass:       {}", report.stats.pass);
    println!("    Warn:       {}", report.stats.warn);
    println!("    Fail:       {}", report.stats.fail);
    println!("    Overfilled: {}", report.stats.overfilled_wirepaths);
}

fn output_wirepath_line(fill: &WirepathFill) {
    let verdict = if fill.compliant { "OK" } else { "OVERFILLED" };
    match fill.label {
        Some(ref label) => println!("    {}  [{}]", label, verdict),
        None => println!(
            "    {} {} (empty)  [{}]",
            fill.trade_size, fill.conduit_kind, verdict
        ),
    }
}

fn output_fill_human(fill: &WirepathFill) {
    output_wirepath_line(fill);
    println!("    Fill: {:.1}% of {} {}", fill.fill_pct, fill.trade_size, fill.conduit_kind);
}

fn output_device_human(estimate: &CurrentEstimate) {
    println!("  Standby: {:.4} A", estimate.standby_a);
    println!("  Alarm:   {:.4} A", estimate.alarm_a);
    println!("  Source:  {:?}", estimate.source);
}
