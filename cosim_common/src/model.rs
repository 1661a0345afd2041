//! Model backend trait and error types.
//!
//! This module defines:
//! - `ModelBackend` trait - Interface for pluggable stepped model backends
//! - `ModelError` enum - Error types for backend operations
//! - `BackendFactory` type alias - Factory function type

use thiserror::Error;

/// Error types for model backend operations.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// A set/get referenced a variable name the model does not bind.
    #[error("Unknown model variable: {0}")]
    UnknownVariable(String),

    /// The model rejected a step (e.g. non-convergence). Non-retryable.
    #[error("Model step rejected: {0}")]
    StepRejected(String),

    /// A lifecycle operation was called out of order on the backend.
    #[error("Invalid lifecycle call: {0}")]
    InvalidLifecycle(String),

    /// Instance creation failed.
    #[error("Instantiation failed: {0}")]
    InstantiationFailed(String),

    /// No backend with the requested name is registered.
    #[error("Backend not found: {0}")]
    BackendNotFound(String),
}

/// Factory function type for creating backend instances.
pub type BackendFactory = fn() -> Box<dyn ModelBackend>;

/// Trait defining the interface for stepped dynamical-model backends.
///
/// The driver manages backends through this trait, enabling pluggable
/// model implementations (kinematic simulation, echo stub, etc.).
///
/// # Lifecycle
///
/// 1. `instantiate()` - Create one model instance (identifier + instance name)
/// 2. `reset()` - Return the instance to its pristine state
/// 3. `setup_experiment()` - Fix the experiment start time and polling cadence
/// 4. `enter_initialization()` / `exit_initialization()` - One-shot init window
/// 5. `set_real()` / `do_step()` / `get_real()` - Per-tick exchange, any number of times
/// 6. `free_instance()` - Release the instance
///
/// Re-entering initialization after `exit_initialization()` is invalid and
/// must be rejected with [`ModelError::InvalidLifecycle`].
///
/// # Timing Contract
///
/// `do_step()` is called once per fixed tick and must be synchronous and
/// bounded well within the tick budget — no blocking I/O, no allocation
/// proportional to elapsed time.
pub trait ModelBackend: Send {
    /// Returns the backend's unique identifier (e.g., "drone", "echo").
    fn name(&self) -> &'static str;

    /// Returns the backend's semantic version.
    fn version(&self) -> &'static str;

    /// Create one live model instance.
    ///
    /// # Arguments
    /// * `identifier` - Deployment model identifier
    /// * `instance_name` - Name of this particular instance
    ///
    /// # Errors
    /// Returns `ModelError::InstantiationFailed` if the instance cannot be
    /// created, or `ModelError::InvalidLifecycle` if one already exists.
    fn instantiate(&mut self, identifier: &str, instance_name: &str) -> Result<(), ModelError>;

    /// Return the instance to its pristine pre-experiment state.
    fn reset(&mut self) -> Result<(), ModelError>;

    /// Fix the experiment start time and the polling cadence.
    ///
    /// The tick rate is communicated to the model so its internal sampling
    /// matches the driver's fixed cadence.
    fn setup_experiment(&mut self, start_time: f64, tick_rate_hz: u32) -> Result<(), ModelError>;

    /// Enter the initialization window.
    fn enter_initialization(&mut self) -> Result<(), ModelError>;

    /// Exit the initialization window. After this the model accepts
    /// `set_real`/`do_step`/`get_real` and nothing else until teardown.
    fn exit_initialization(&mut self) -> Result<(), ModelError>;

    /// Write a scalar into a named model input slot.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownVariable` if the name is not bound;
    /// bound variables are left unchanged in that case.
    fn set_real(&mut self, name: &str, value: f64) -> Result<(), ModelError>;

    /// Read a named scalar model output.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownVariable` if the name is not bound.
    fn get_real(&self, name: &str) -> Result<f64, ModelError>;

    /// Advance the model by exactly `dt` simulated seconds starting at
    /// `current_time`.
    ///
    /// # Errors
    /// Returns `ModelError::StepRejected` if the model refuses the step.
    /// A rejected step leaves the model in an undefined position — callers
    /// must not retry.
    fn do_step(&mut self, current_time: f64, dt: f64) -> Result<(), ModelError>;

    /// Release the model instance and its resources.
    fn free_instance(&mut self) -> Result<(), ModelError>;
}
