//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the cosim workspace, plus the driver's own configuration surface.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cosim_common::config::{ConfigLoader, CosimConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = CosimConfig::load(Path::new("cosim.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{DEFAULT_GAIN, DEFAULT_TICK_RATE_HZ, MAX_TICK_RATE_HZ};
use crate::types::Axis;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

/// Common configuration fields shared across cosim applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "cosim-drone-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "cosim-drone-01".to_string(),
        }
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
/// - Semantic validation is the caller's responsibility (`validate()`)
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// ─── Model Selection ────────────────────────────────────────────────

/// Which model backend to run and how to name its instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend name in the registry (e.g. "drone", "echo").
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Deployment model identifier passed to `instantiate()`.
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Instance name passed to `instantiate()`.
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
}

fn default_backend() -> String {
    "drone".to_string()
}

fn default_identifier() -> String {
    "drone_hover".to_string()
}

fn default_instance_name() -> String {
    "drone-01".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            identifier: default_identifier(),
            instance_name: default_instance_name(),
        }
    }
}

impl ModelConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.backend cannot be empty".to_string(),
            ));
        }
        if self.identifier.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.identifier cannot be empty".to_string(),
            ));
        }
        if self.instance_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.instance_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Control Tunables ───────────────────────────────────────────────

/// Driver tunables, fixed at session start — no runtime reconfiguration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Scalar multiplier applied to integrated commands.
    #[serde(default = "default_gain")]
    pub gain: f64,

    /// Fixed tick rate in Hz. Drives the tick loop and is communicated to
    /// the model backend's polling configuration.
    #[serde(default = "default_tick_rate")]
    pub target_tick_rate: u32,
}

fn default_gain() -> f64 {
    DEFAULT_GAIN
}

fn default_tick_rate() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            target_tick_rate: default_tick_rate(),
        }
    }
}

impl ControlConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `gain` is not finite or not positive
    /// - `target_tick_rate` is zero or above [`MAX_TICK_RATE_HZ`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "control.gain must be finite and positive, got {}",
                self.gain
            )));
        }
        if self.target_tick_rate == 0 || self.target_tick_rate > MAX_TICK_RATE_HZ {
            return Err(ConfigError::ValidationError(format!(
                "control.target_tick_rate must be in 1..={}, got {}",
                MAX_TICK_RATE_HZ, self.target_tick_rate
            )));
        }
        Ok(())
    }

    /// Fixed per-tick time increment in simulated seconds.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.target_tick_rate)
    }
}

// ─── Variable Bindings ──────────────────────────────────────────────

/// Fixed name→axis binding table for model variable exchange.
///
/// Names are fixed at configuration time and never renamed at runtime.
/// The binding may deliberately permute axes — the default maps the
/// integrator's y accumulator onto the model's `zcoord` input and vice
/// versa, reproducing the deployed coordinate conversion. Feedback
/// bindings are identity by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Model input slot receiving the integrated x command.
    #[serde(default = "default_command_x")]
    pub command_x: String,
    /// Model input slot receiving the integrated y command.
    #[serde(default = "default_command_y")]
    pub command_y: String,
    /// Model input slot receiving the integrated z command.
    #[serde(default = "default_command_z")]
    pub command_z: String,
    /// Model output slot read back as the x position.
    #[serde(default = "default_feedback_x")]
    pub feedback_x: String,
    /// Model output slot read back as the y position.
    #[serde(default = "default_feedback_y")]
    pub feedback_y: String,
    /// Model output slot read back as the z position.
    #[serde(default = "default_feedback_z")]
    pub feedback_z: String,
}

fn default_command_x() -> String {
    "xcoord".to_string()
}

fn default_command_y() -> String {
    "zcoord".to_string()
}

fn default_command_z() -> String {
    "ycoord".to_string()
}

fn default_feedback_x() -> String {
    "xgps".to_string()
}

fn default_feedback_y() -> String {
    "ygps".to_string()
}

fn default_feedback_z() -> String {
    "zgps".to_string()
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            command_x: default_command_x(),
            command_y: default_command_y(),
            command_z: default_command_z(),
            feedback_x: default_feedback_x(),
            feedback_y: default_feedback_y(),
            feedback_z: default_feedback_z(),
        }
    }
}

impl BindingConfig {
    /// Model input name bound to the given integrator axis.
    #[inline]
    pub fn command(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.command_x,
            Axis::Y => &self.command_y,
            Axis::Z => &self.command_z,
        }
    }

    /// Model output name read back for the given result axis.
    #[inline]
    pub fn feedback(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.feedback_x,
            Axis::Y => &self.feedback_y,
            Axis::Z => &self.feedback_z,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if any name is empty or the
    /// three names on either side are not pairwise distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let commands = [&self.command_x, &self.command_y, &self.command_z];
        let feedbacks = [&self.feedback_x, &self.feedback_y, &self.feedback_z];

        for name in commands.iter().chain(feedbacks.iter()) {
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "binding names cannot be empty".to_string(),
                ));
            }
        }

        for (i, a) in commands.iter().enumerate() {
            for b in commands.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::ValidationError(format!(
                        "duplicate command binding: {a}"
                    )));
                }
            }
        }
        for (i, a) in feedbacks.iter().enumerate() {
            for b in feedbacks.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::ValidationError(format!(
                        "duplicate feedback binding: {a}"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete driver configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "cosim-drone-01"
///
/// [model]
/// backend = "drone"
///
/// [control]
/// gain = 5.0
/// target_tick_rate = 100
///
/// [bindings]
/// command_y = "zcoord"
/// command_z = "ycoord"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CosimConfig {
    /// Shared application fields.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Model backend selection.
    #[serde(default)]
    pub model: ModelConfig,

    /// Driver tunables.
    #[serde(default)]
    pub control: ControlConfig,

    /// Variable binding table.
    #[serde(default)]
    pub bindings: BindingConfig,
}

impl ConfigLoader for CosimConfig {}

impl CosimConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.model.validate()?;
        self.control.validate()?;
        self.bindings.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_deployment() {
        let config = CosimConfig::default();
        config.validate().unwrap();

        assert_eq!(config.control.gain, 5.0);
        assert_eq!(config.control.target_tick_rate, 100);
        assert_eq!(config.model.backend, "drone");

        // The deployed coordinate conversion: y and z command slots swapped.
        assert_eq!(config.bindings.command(Axis::X), "xcoord");
        assert_eq!(config.bindings.command(Axis::Y), "zcoord");
        assert_eq!(config.bindings.command(Axis::Z), "ycoord");
        assert_eq!(config.bindings.feedback(Axis::Y), "ygps");
    }

    #[test]
    fn dt_is_tick_period() {
        let control = ControlConfig {
            gain: 1.0,
            target_tick_rate: 100,
        };
        assert!((control.dt() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn gain_must_be_positive() {
        let control = ControlConfig {
            gain: 0.0,
            target_tick_rate: 100,
        };
        assert!(matches!(
            control.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let control = ControlConfig {
            gain: f64::NAN,
            target_tick_rate: 100,
        };
        assert!(control.validate().is_err());
    }

    #[test]
    fn tick_rate_bounds() {
        let control = ControlConfig {
            gain: 1.0,
            target_tick_rate: 0,
        };
        assert!(control.validate().is_err());

        let control = ControlConfig {
            gain: 1.0,
            target_tick_rate: MAX_TICK_RATE_HZ + 1,
        };
        assert!(control.validate().is_err());
    }

    #[test]
    fn duplicate_bindings_rejected() {
        let bindings = BindingConfig {
            command_y: "xcoord".to_string(),
            ..BindingConfig::default()
        };
        assert!(matches!(
            bindings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_binding_rejected() {
        let bindings = BindingConfig {
            feedback_z: String::new(),
            ..BindingConfig::default()
        };
        assert!(bindings.validate().is_err());
    }

    #[test]
    fn empty_service_name_rejected() {
        let shared = SharedConfig {
            log_level: LogLevel::Info,
            service_name: String::new(),
        };
        assert!(shared.validate().is_err());
    }
}
