//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use cosim_common::prelude::*;` and get
//! the most important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use cosim_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, CosimConfig, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, CHANNEL_COUNT, DEFAULT_TICK_RATE_HZ};

// ─── Core Types ─────────────────────────────────────────────────────
pub use crate::types::{Axis, AxisCommand, ChannelId, IntegratedPosition, ResultPosition};

// ─── Model Backend ──────────────────────────────────────────────────
pub use crate::model::{BackendFactory, ModelBackend, ModelError};

/// Default tick period as Duration (100 Hz = 10 ms).
pub const DEFAULT_TICK_PERIOD: Duration =
    Duration::from_micros(1_000_000 / DEFAULT_TICK_RATE_HZ as u64);
