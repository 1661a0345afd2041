//! Passthrough stub model.
//!
//! The `EchoBackend` mirrors each command input slot to the matching
//! position output unchanged. Used for integration tests and for running
//! the driver pipeline without any model dynamics in the loop.

use cosim_common::model::{ModelBackend, ModelError};
use tracing::debug;

const COMMAND_VARS: [&str; 3] = ["xcoord", "ycoord", "zcoord"];
const FEEDBACK_VARS: [&str; 3] = ["xgps", "ygps", "zgps"];

/// Echo backend implementing the `ModelBackend` trait.
///
/// Variable names match the drone model so the two are interchangeable
/// under the same binding table.
#[derive(Debug, Default)]
pub struct EchoBackend {
    instantiated: bool,
    initialized: bool,
    freed: bool,
    inputs: [f64; 3],
}

impl EchoBackend {
    /// Create a new echo backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn require_live(&self, operation: &str) -> Result<(), ModelError> {
        if !self.instantiated || self.freed {
            return Err(ModelError::InvalidLifecycle(format!(
                "{operation} requires a live instance"
            )));
        }
        Ok(())
    }
}

impl ModelBackend for EchoBackend {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn instantiate(&mut self, identifier: &str, instance_name: &str) -> Result<(), ModelError> {
        if self.instantiated {
            return Err(ModelError::InvalidLifecycle(
                "instance already exists".to_string(),
            ));
        }
        self.instantiated = true;
        debug!("Echo model '{}' instantiated as '{}'", identifier, instance_name);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModelError> {
        self.require_live("reset")?;
        self.inputs = [0.0; 3];
        self.initialized = false;
        Ok(())
    }

    fn setup_experiment(&mut self, _start_time: f64, _tick_rate_hz: u32) -> Result<(), ModelError> {
        self.require_live("setup_experiment")
    }

    fn enter_initialization(&mut self) -> Result<(), ModelError> {
        self.require_live("enter_initialization")
    }

    fn exit_initialization(&mut self) -> Result<(), ModelError> {
        self.require_live("exit_initialization")?;
        self.initialized = true;
        Ok(())
    }

    fn set_real(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        self.require_live("set_real")?;
        let slot = COMMAND_VARS
            .iter()
            .position(|v| *v == name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))?;
        self.inputs[slot] = value;
        Ok(())
    }

    fn get_real(&self, name: &str) -> Result<f64, ModelError> {
        self.require_live("get_real")?;
        let slot = FEEDBACK_VARS
            .iter()
            .position(|v| *v == name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))?;
        Ok(self.inputs[slot])
    }

    fn do_step(&mut self, _current_time: f64, dt: f64) -> Result<(), ModelError> {
        self.require_live("do_step")?;
        if !self.initialized {
            return Err(ModelError::InvalidLifecycle(
                "do_step before initialization completed".to_string(),
            ));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::StepRejected(format!(
                "step size must be finite and positive, got {dt}"
            )));
        }
        Ok(())
    }

    fn free_instance(&mut self) -> Result<(), ModelError> {
        self.require_live("free_instance")?;
        self.freed = true;
        Ok(())
    }
}
