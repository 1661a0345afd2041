//! Kinematic drone hover model.
//!
//! The `DroneBackend` tracks three commanded position inputs with
//! velocity- and acceleration-limited motion, one independent kinematic
//! channel per spatial axis. Command variables are `xcoord`/`ycoord`/
//! `zcoord`; position outputs are `xgps`/`ygps`/`zgps`.

use cosim_common::model::{ModelBackend, ModelError};
use tracing::{debug, trace};

/// Command input variable names, in axis slot order.
const COMMAND_VARS: [&str; 3] = ["xcoord", "ycoord", "zcoord"];

/// Position output variable names, in axis slot order.
const FEEDBACK_VARS: [&str; 3] = ["xgps", "ygps", "zgps"];

/// Kinematic limits for the drone model.
#[derive(Debug, Clone, Copy)]
pub struct DroneParams {
    /// Maximum speed per axis [units/s].
    pub max_velocity: f64,
    /// Maximum acceleration per axis [units/s²].
    pub max_acceleration: f64,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            max_velocity: 10.0,
            max_acceleration: 20.0,
        }
    }
}

/// Backend lifecycle phase.
///
/// The model session enforces the public call order; the backend keeps its
/// own guard so out-of-order calls fail as a lifecycle error rather than
/// producing undefined motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Instantiated,
    Configured,
    Initializing,
    Running,
    Freed,
}

/// Per-axis kinematic state.
#[derive(Debug, Clone, Copy, Default)]
struct AxisKinematics {
    position: f64,
    velocity: f64,
    target: f64,
}

impl AxisKinematics {
    /// Advance one step toward the target with a triangular velocity
    /// profile under the configured limits.
    fn advance(&mut self, dt: f64, params: &DroneParams) {
        let position_error = self.target - self.position;

        // Distance needed to stop from the current speed.
        let stopping_distance =
            self.velocity * self.velocity / (2.0 * params.max_acceleration);

        let desired_velocity = if position_error.abs() <= stopping_distance {
            // Deceleration phase
            position_error.signum()
                * (2.0 * params.max_acceleration * position_error.abs())
                    .sqrt()
                    .min(params.max_velocity)
        } else {
            // Acceleration/cruise phase
            position_error.signum() * params.max_velocity
        };

        let max_vel_change = params.max_acceleration * dt;
        let vel_change =
            (desired_velocity - self.velocity).clamp(-max_vel_change, max_vel_change);
        self.velocity =
            (self.velocity + vel_change).clamp(-params.max_velocity, params.max_velocity);

        self.position += self.velocity * dt;
    }
}

/// Drone hover model implementing the `ModelBackend` trait.
pub struct DroneBackend {
    params: DroneParams,
    phase: Phase,
    instance_name: String,
    start_time: f64,
    tick_rate_hz: u32,
    axes: [AxisKinematics; 3],
}

impl DroneBackend {
    /// Create a new drone backend with the given kinematic limits.
    pub fn new(params: DroneParams) -> Self {
        Self {
            params,
            phase: Phase::Idle,
            instance_name: String::new(),
            start_time: 0.0,
            tick_rate_hz: 0,
            axes: [AxisKinematics::default(); 3],
        }
    }

    fn require_phase(&self, expected: Phase, operation: &str) -> Result<(), ModelError> {
        if self.phase != expected {
            return Err(ModelError::InvalidLifecycle(format!(
                "{operation} requires {expected:?}, backend is {:?}",
                self.phase
            )));
        }
        Ok(())
    }

    fn command_slot(&self, name: &str) -> Option<usize> {
        COMMAND_VARS.iter().position(|v| *v == name)
    }

    fn feedback_slot(&self, name: &str) -> Option<usize> {
        FEEDBACK_VARS.iter().position(|v| *v == name)
    }

    /// Experiment start time fixed by `setup_experiment`.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Polling cadence fixed by `setup_experiment`.
    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }
}

impl Default for DroneBackend {
    fn default() -> Self {
        Self::new(DroneParams::default())
    }
}

impl ModelBackend for DroneBackend {
    fn name(&self) -> &'static str {
        "drone"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn instantiate(&mut self, identifier: &str, instance_name: &str) -> Result<(), ModelError> {
        if self.phase != Phase::Idle {
            return Err(ModelError::InvalidLifecycle(format!(
                "instance '{}' already exists",
                self.instance_name
            )));
        }
        if identifier.is_empty() || instance_name.is_empty() {
            return Err(ModelError::InstantiationFailed(
                "identifier and instance name must be non-empty".to_string(),
            ));
        }

        self.instance_name = instance_name.to_string();
        self.phase = Phase::Instantiated;
        debug!("Drone model '{}' instantiated as '{}'", identifier, instance_name);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModelError> {
        match self.phase {
            Phase::Idle | Phase::Freed => Err(ModelError::InvalidLifecycle(
                "reset requires a live instance".to_string(),
            )),
            _ => {
                self.axes = [AxisKinematics::default(); 3];
                self.start_time = 0.0;
                self.tick_rate_hz = 0;
                self.phase = Phase::Instantiated;
                debug!("Drone model '{}' reset", self.instance_name);
                Ok(())
            }
        }
    }

    fn setup_experiment(&mut self, start_time: f64, tick_rate_hz: u32) -> Result<(), ModelError> {
        self.require_phase(Phase::Instantiated, "setup_experiment")?;
        if tick_rate_hz == 0 {
            return Err(ModelError::InvalidLifecycle(
                "tick rate must be nonzero".to_string(),
            ));
        }
        self.start_time = start_time;
        self.tick_rate_hz = tick_rate_hz;
        self.phase = Phase::Configured;
        debug!(
            "Drone model '{}' experiment: start={:.3}s, polling={}Hz",
            self.instance_name, start_time, tick_rate_hz
        );
        Ok(())
    }

    fn enter_initialization(&mut self) -> Result<(), ModelError> {
        self.require_phase(Phase::Configured, "enter_initialization")?;
        self.phase = Phase::Initializing;
        Ok(())
    }

    fn exit_initialization(&mut self) -> Result<(), ModelError> {
        self.require_phase(Phase::Initializing, "exit_initialization")?;
        self.phase = Phase::Running;
        debug!("Drone model '{}' running", self.instance_name);
        Ok(())
    }

    fn set_real(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        if self.phase != Phase::Initializing && self.phase != Phase::Running {
            return Err(ModelError::InvalidLifecycle(format!(
                "set_real outside initialization/running, backend is {:?}",
                self.phase
            )));
        }
        let slot = self
            .command_slot(name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))?;
        self.axes[slot].target = value;
        Ok(())
    }

    fn get_real(&self, name: &str) -> Result<f64, ModelError> {
        self.require_phase(Phase::Running, "get_real")?;
        let slot = self
            .feedback_slot(name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))?;
        Ok(self.axes[slot].position)
    }

    fn do_step(&mut self, current_time: f64, dt: f64) -> Result<(), ModelError> {
        self.require_phase(Phase::Running, "do_step")?;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::StepRejected(format!(
                "step size must be finite and positive, got {dt}"
            )));
        }

        for axis in &mut self.axes {
            axis.advance(dt, &self.params);
        }

        trace!(
            "Drone '{}' t={:.3}: pos=({:.3}, {:.3}, {:.3})",
            self.instance_name,
            current_time + dt,
            self.axes[0].position,
            self.axes[1].position,
            self.axes[2].position
        );
        Ok(())
    }

    fn free_instance(&mut self) -> Result<(), ModelError> {
        match self.phase {
            Phase::Idle => Err(ModelError::InvalidLifecycle(
                "no instance to free".to_string(),
            )),
            Phase::Freed => Err(ModelError::InvalidLifecycle(
                "instance already freed".to_string(),
            )),
            _ => {
                self.phase = Phase::Freed;
                debug!("Drone model '{}' freed", self.instance_name);
                Ok(())
            }
        }
    }
}
