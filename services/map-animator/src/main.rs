//! Map animator service.
//!
//! Reads a NetCDF variable and writes one rendered map per time step.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use map_animator::{load_config, AnimatorConfig, Animator, ConfigOverrides, RunReport};

#[derive(Parser, Debug)]
#[command(name = "map-animator")]
#[command(about = "Render one climate map per time step of a NetCDF variable")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "MAP_ANIMATOR_CONFIG")]
    config: Option<PathBuf>,

    /// NetCDF input file (overrides input.path)
    #[arg(short, long, env = "MAP_ANIMATOR_INPUT")]
    input: Option<PathBuf>,

    /// Variable to plot (overrides input.variable)
    #[arg(short, long)]
    variable: Option<String>,

    /// Directory for the rendered frames (overrides output.dir)
    #[arg(short, long, env = "MAP_ANIMATOR_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// First time index to render
    #[arg(long)]
    start: Option<usize>,

    /// Time index to stop before
    #[arg(long)]
    end: Option<usize>,

    /// Render every n-th time step
    #[arg(long)]
    stride: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input: self.input.clone(),
            variable: self.variable.clone(),
            output_dir: self.output_dir.clone(),
            start: self.start,
            end: self.end,
            stride: self.stride,
        }
    }
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    match run(&args) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            let failed: Vec<usize> = report.failed.iter().map(|f| f.index).collect();
            error!(?failed, "Some frames could not be rendered");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = format!("{:#}", e), "Animation aborted");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt().with_env_filter(filter).with_target(true);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &Args) -> Result<RunReport> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => AnimatorConfig::default(),
    };
    config.apply(args.overrides());

    info!(
        input = %config.input.path.display(),
        variable = %config.input.variable,
        "Starting map animator"
    );

    let animator = Animator::prepare(config).context("Failed to prepare the animation")?;
    animator
        .summarize()
        .context("Failed to read the data summary")?;

    Ok(animator.run())
}
