//! Model session lifecycle.
//!
//! `ModelSession` owns one live model backend instance and mediates all
//! value exchange with it. The manual create/reset/init/dispose sequence
//! of the underlying backend is wrapped in an explicit finite state
//! machine, so an invalid call order is a detectable precondition failure
//! instead of undefined backend behavior.

use cosim_common::model::{ModelBackend, ModelError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Session lifecycle state.
///
/// Exactly one forward path:
/// `Uninstantiated → Created → Reset → Configuring → Initializing → Ready
/// → Terminated`. No transition is valid from `Terminated`, and the
/// initialization window cannot be re-entered once exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionState {
    /// No backend instance exists yet.
    Uninstantiated = 0,
    /// Instance created, not yet reset.
    Created = 1,
    /// Instance reset to its pristine state.
    Reset = 2,
    /// Experiment start time and cadence configured.
    Configuring = 3,
    /// Initialization window open.
    Initializing = 4,
    /// Accepting set/step/get exchange.
    Ready = 5,
    /// Instance freed; final state.
    Terminated = 6,
}

impl SessionState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Uninstantiated),
            1 => Some(Self::Created),
            2 => Some(Self::Reset),
            3 => Some(Self::Configuring),
            4 => Some(Self::Initializing),
            5 => Some(Self::Ready),
            6 => Some(Self::Terminated),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Uninstantiated
    }
}

/// Errors surfaced by the model session.
///
/// All of these are fatal to the current tick and propagate unmodified to
/// the driver — none is retryable, since a failed operation leaves the
/// stateful model in an undefined position.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Operation attempted outside its required state.
    #[error("Invalid session state for {operation}: {state:?}")]
    InvalidSessionState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the session was in.
        state: SessionState,
    },

    /// A set/get referenced a name with no binding in the model.
    #[error("Unknown model variable: {0}")]
    UnknownVariable(String),

    /// The backend rejected a step. Fatal to the session.
    #[error("Model step failed: {0}")]
    StepFailed(String),

    /// The backend failed during the startup transition chain.
    #[error("Session startup failed: {0}")]
    Startup(String),

    /// Any other backend failure during value exchange.
    #[error("Model backend error: {0}")]
    Backend(String),
}

/// Map a backend error from the exchange phase onto the session taxonomy.
fn map_exchange_error(err: ModelError) -> SessionError {
    match err {
        ModelError::UnknownVariable(name) => SessionError::UnknownVariable(name),
        ModelError::StepRejected(reason) => SessionError::StepFailed(reason),
        other => SessionError::Backend(other.to_string()),
    }
}

/// Owns the lifecycle of one model instance and all exchange with it.
pub struct ModelSession {
    backend: Box<dyn ModelBackend>,
    state: SessionState,
    identifier: String,
    instance_name: String,
    tick_rate_hz: u32,
}

impl ModelSession {
    /// Create a session around an uninstantiated backend.
    ///
    /// # Arguments
    /// * `backend` - The model backend, not yet instantiated
    /// * `identifier` - Deployment model identifier
    /// * `instance_name` - Name for this instance
    /// * `tick_rate_hz` - Polling cadence communicated to the model
    pub fn new(
        backend: Box<dyn ModelBackend>,
        identifier: String,
        instance_name: String,
        tick_rate_hz: u32,
    ) -> Self {
        Self {
            backend,
            state: SessionState::default(),
            identifier,
            instance_name,
            tick_rate_hz,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Backend identifier (e.g. "drone", "echo").
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run the startup transition chain and land in `Ready`.
    ///
    /// instantiate → reset → setup_experiment → enter_initialization →
    /// exit_initialization, with the session state advanced at each edge.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidSessionState` unless called in
    /// `Uninstantiated`, or `SessionError::Startup` if the backend fails
    /// anywhere in the chain. After a startup failure only `teardown()`
    /// remains valid.
    pub fn start(&mut self, start_time: f64) -> Result<(), SessionError> {
        if self.state != SessionState::Uninstantiated {
            return Err(SessionError::InvalidSessionState {
                operation: "start",
                state: self.state,
            });
        }

        self.backend
            .instantiate(&self.identifier, &self.instance_name)
            .map_err(|e| SessionError::Startup(format!("instantiate: {e}")))?;
        self.state = SessionState::Created;

        self.backend
            .reset()
            .map_err(|e| SessionError::Startup(format!("reset: {e}")))?;
        self.state = SessionState::Reset;

        self.backend
            .setup_experiment(start_time, self.tick_rate_hz)
            .map_err(|e| SessionError::Startup(format!("setup_experiment: {e}")))?;
        self.state = SessionState::Configuring;

        self.backend
            .enter_initialization()
            .map_err(|e| SessionError::Startup(format!("enter_initialization: {e}")))?;
        self.state = SessionState::Initializing;

        self.backend
            .exit_initialization()
            .map_err(|e| SessionError::Startup(format!("exit_initialization: {e}")))?;
        self.state = SessionState::Ready;

        info!(
            "Session '{}' ready (model '{}' via {} v{}, {} Hz)",
            self.instance_name,
            self.identifier,
            self.backend.name(),
            self.backend.version(),
            self.tick_rate_hz
        );
        Ok(())
    }

    fn require_ready(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidSessionState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Write a scalar into a named model input slot.
    ///
    /// # Errors
    /// `InvalidSessionState` outside `Ready`; `UnknownVariable` if the
    /// name is not bound (bound variables are left unchanged).
    pub fn set_variable(&mut self, name: &str, value: f64) -> Result<(), SessionError> {
        self.require_ready("set_variable")?;
        self.backend
            .set_real(name, value)
            .map_err(map_exchange_error)
    }

    /// Advance the model by exactly `dt` starting at `current_time`.
    ///
    /// Must be called at most once per tick, strictly after the tick's
    /// `set_variable` calls and strictly before its `get_variable` calls.
    ///
    /// # Errors
    /// `InvalidSessionState` outside `Ready`; `StepFailed` if the backend
    /// rejects the step — fatal to the session, never retried.
    pub fn step(&mut self, current_time: f64, dt: f64) -> Result<(), SessionError> {
        self.require_ready("step")?;
        self.backend
            .do_step(current_time, dt)
            .map_err(map_exchange_error)
    }

    /// Read a named scalar model output.
    ///
    /// # Errors
    /// `InvalidSessionState` outside `Ready`; `UnknownVariable` if the
    /// name is not bound.
    pub fn get_variable(&self, name: &str) -> Result<f64, SessionError> {
        self.require_ready("get_variable")?;
        self.backend.get_real(name).map_err(map_exchange_error)
    }

    /// Release the backend instance. Idempotent.
    ///
    /// The first call frees the instance and moves to `Terminated`;
    /// repeated calls are a guarded no-op. Never raises — a backend
    /// failure during free is logged and the session still terminates.
    /// Safe to invoke from any state, including mid-tick on shutdown.
    pub fn teardown(&mut self) {
        if self.state == SessionState::Terminated {
            debug!("Session '{}' teardown already complete", self.instance_name);
            return;
        }

        if self.state != SessionState::Uninstantiated {
            if let Err(e) = self.backend.free_instance() {
                warn!("Session '{}' free_instance failed: {}", self.instance_name, e);
            }
        }
        self.state = SessionState::Terminated;
        info!("Session '{}' terminated", self.instance_name);
    }
}

impl Drop for ModelSession {
    fn drop(&mut self) {
        // Terminated is absorbing, so a second pass is a no-op.
        self.teardown();
    }
}
