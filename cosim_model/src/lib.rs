//! # Cosim Model Backends
//!
//! Stepped dynamical-model backends for the co-simulation driver.
//! Backends implement the `ModelBackend` trait defined in
//! `cosim_common::model` and are created by name through the
//! [`BackendRegistry`].
//!
//! # Module Structure
//!
//! - [`drone`] - Kinematic hover model with velocity/acceleration limits
//! - [`echo`] - Passthrough stub that mirrors command inputs to outputs
//! - [`registry`] - Backend factory registration

#![deny(warnings)]
#![deny(missing_docs)]

pub mod drone;
pub mod echo;
pub mod registry;

// Re-export key types for convenience
pub use crate::drone::{DroneBackend, DroneParams};
pub use crate::echo::EchoBackend;
pub use crate::registry::{BackendRegistry, builtin_registry};
