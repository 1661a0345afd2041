//! System-wide constants for the cosim workspace.
//!
//! Single source of truth for defaults and limits.
//! Imported by all crates — no duplication permitted.

/// Number of spatial axes driven by the co-simulation.
pub const AXIS_COUNT: usize = 3;

/// Number of directional input channels (two opposing per axis).
pub const CHANNEL_COUNT: usize = 6;

/// Default fixed tick rate in Hz (matches the model's polling cadence).
pub const DEFAULT_TICK_RATE_HZ: u32 = 100;

/// Default gain applied to integrated operator commands.
pub const DEFAULT_GAIN: f64 = 5.0;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cosim/cosim.toml";

/// Upper bound on the configurable tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 10_000;
