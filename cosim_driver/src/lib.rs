//! # Cosim Driver Library
//!
//! Real-time co-simulation driver coupling a live control-input stream to a
//! stepped dynamical-model backend. Once per fixed tick the driver samples
//! the six directional input channels, integrates them into a target
//! position, pushes the target into the model, advances the model by one
//! time step, and hands the resulting position to the consuming sink.
//!
//! # Module Structure
//!
//! - [`input`] - Six-channel input aggregation (activate/release table)
//! - [`integrator`] - Command integration into operator-intent position
//! - [`session`] - Model instance lifecycle state machine
//! - [`driver`] - Fixed-tick orchestration loop
//! - [`sink`] - Position sink seam toward the consuming layer
//!
//! # Data Flow
//!
//! ```text
//! input channels → integrator → driver → session (set) → session (step)
//!                                      → session (get) → position sink
//! ```

pub mod driver;
pub mod input;
pub mod integrator;
pub mod session;
pub mod sink;

// Re-export key types for convenience
pub use crate::driver::{CosimDriver, DriverError, TickStats};
pub use crate::input::InputChannels;
pub use crate::integrator::CommandIntegrator;
pub use crate::session::{ModelSession, SessionError, SessionState};
pub use crate::sink::{CollectSink, LogSink, PositionSink};
