//! climate-maps: annual tasmax summaries and monthly regional maps for each
//! configured climate scenario.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use climate_common::BoundingBox;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use climate_maps::config::{ExtentConfig, MapsConfig};
use climate_maps::{run, FigureSink, MapStyle, NetCdfLoader, PngDirectorySink, ViewerSink};

#[derive(Parser, Debug)]
#[command(name = "climate-maps")]
#[command(about = "Annual maximum-temperature summaries and regional maps for climate scenarios")]
struct Args {
    /// Configuration file path (YAML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that relative scenario paths are resolved against
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Directory receiving the PNG figures
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Open each figure with this command and wait for it to exit
    #[arg(long)]
    viewer: Option<String>,

    /// Map extent as "minlon,minlat,maxlon,maxlat"
    #[arg(long)]
    extent: Option<String>,

    /// Only process these scenario labels (repeatable)
    #[arg(short, long = "scenario")]
    scenarios: Vec<String>,

    /// Print summaries without rendering maps
    #[arg(long)]
    summary_only: bool,

    /// Stop at the first failing scenario
    #[arg(long)]
    fail_fast: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.log_json) {
        eprintln!("Failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run_cli(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %format!("{:#}", e), "climate-maps failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Returns whether every scenario completed.
fn run_cli(args: Args) -> Result<bool> {
    let mut config = MapsConfig::load(args.config.as_deref())?;
    config.apply_env();

    if let Some(root) = args.data_root {
        config.data_root = Some(root);
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(viewer) = args.viewer {
        config.output.viewer = Some(viewer);
    }
    if let Some(extent) = &args.extent {
        let bbox = BoundingBox::from_extent_string(extent)
            .with_context(|| format!("Invalid --extent '{}'", extent))?;
        config.extent = ExtentConfig::from(bbox);
    }
    if args.fail_fast {
        config.fail_fast = true;
    }
    config.select_scenarios(&args.scenarios)?;
    config.expand_paths()?;
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(true);
    }

    netcdf_parser::silence_hdf5_errors();

    info!(
        scenarios = config.scenarios.len(),
        months = config.months.len(),
        variable = %config.variable,
        "Starting climate-maps"
    );

    let style = MapStyle::from_config(&config)?;
    let loader = NetCdfLoader::new(&config);

    let mut sink: Option<Box<dyn FigureSink>> = if args.summary_only {
        None
    } else if let Some(viewer) = &config.output.viewer {
        Some(Box::new(ViewerSink::new(viewer)?))
    } else {
        Some(Box::new(PngDirectorySink::new(&config.output.dir)?))
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let sink = sink.as_mut().map(|s| s.as_mut() as &mut dyn FigureSink);
    let report = run(&config, &loader, &style, sink, &mut out)?;
    out.flush()?;

    info!(
        scenarios = config.scenarios.len(),
        failed = report.failed_scenarios(),
        figures = report.figures,
        "Run complete"
    );
    for failure in &report.failures {
        error!(
            scenario = %failure.scenario,
            month = ?failure.month,
            error = %failure.error,
            "Failed"
        );
    }

    Ok(report.is_success())
}
