//! Registry for model backends.
//!
//! Provides a `BackendRegistry` struct for registering and retrieving model
//! backend factories. This uses constructor-injection rather than global
//! state — the registry is built at startup and passed by value, so it is
//! testable in isolation.

use cosim_common::model::{BackendFactory, ModelBackend, ModelError};
use std::collections::HashMap;

use crate::drone::DroneBackend;
use crate::echo::EchoBackend;

/// Registry of available model backends.
pub struct BackendRegistry {
    factories: HashMap<&'static str, BackendFactory>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory.
    ///
    /// # Panics
    /// Panics if a backend with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: BackendFactory) {
        if self.factories.contains_key(name) {
            panic!("Backend '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a backend factory by name.
    pub fn get_factory(&self, name: &str) -> Option<BackendFactory> {
        self.factories.get(name).copied()
    }

    /// Create a backend instance by name.
    ///
    /// # Errors
    /// Returns `ModelError::BackendNotFound` if no backend with the given
    /// name is registered.
    pub fn create(&self, name: &str) -> Result<Box<dyn ModelBackend>, ModelError> {
        let factory = self
            .get_factory(name)
            .ok_or_else(|| ModelError::BackendNotFound(name.to_string()))?;
        Ok(factory())
    }

    /// List all registered backend names.
    pub fn list(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a registry with all built-in backends registered.
pub fn builtin_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register("drone", || Box::new(DroneBackend::default()));
    registry.register("echo", || Box::new(EchoBackend::new()));
    registry
}
