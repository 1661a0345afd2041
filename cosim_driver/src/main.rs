//! # Cosim Driver Binary
//!
//! Fixed-tick co-simulation driver coupling a control-input stream to a
//! stepped model backend.
//!
//! # Usage
//!
//! ```bash
//! # Run with the configured backend
//! cosim_driver --config config/cosim.toml
//!
//! # Force the echo backend
//! cosim_driver --config config/cosim.toml --backend echo
//!
//! # Verbose logging
//! cosim_driver -c config/cosim.toml -v
//! ```
//!
//! The raw input source (device binding layer) writes the six directional
//! channels through [`cosim_driver::input::InputChannels`]; without one
//! attached, the model holds its integrated position at the origin.

use clap::Parser;
use cosim_common::config::{ConfigError, ConfigLoader, CosimConfig};
use cosim_common::consts::DEFAULT_CONFIG_PATH;
use cosim_driver::driver::CosimDriver;
use cosim_driver::sink::LogSink;
use cosim_model::builtin_registry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Cosim driver - fixed-tick co-simulation of a stepped model backend
#[derive(Parser, Debug)]
#[command(name = "cosim_driver")]
#[command(version)]
#[command(about = "Fixed-tick co-simulation driver")]
#[command(long_about = None)]
struct Args {
    /// Path to the driver configuration file (cosim.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured model backend (e.g. "drone", "echo")
    #[arg(short, long)]
    backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Driver startup failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    setup_tracing(&args);

    info!("Cosim driver v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing file falls back to deployment defaults.
    let mut config = match CosimConfig::load(&args.config) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound) => {
            warn!(
                "No config file at {:?}, using deployment defaults",
                args.config
            );
            CosimConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref backend) = args.backend {
        info!("Backend override from CLI: {}", backend);
        config.model.backend = backend.clone();
    }
    config.validate()?;

    // Resolve the backend and build the driver.
    let registry = builtin_registry();
    let backend = registry.create(&config.model.backend)?;
    info!("Created backend: {} v{}", backend.name(), backend.version());

    let mut driver = CosimDriver::new(&config, backend);

    // Setup signal handler.
    let running = driver.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    // Bring the model session up and enter the loop.
    driver.start(0.0)?;

    let mut sink = LogSink::new(u64::from(config.control.target_tick_rate));
    if let Err(e) = driver.run(&mut sink) {
        error!("Co-simulation loop error: {}", e);
    }

    driver.shutdown();
    info!("Cosim driver shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
