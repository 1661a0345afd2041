//! End-to-end driver tests.
//!
//! Exercise the full pipeline — input channels → integrator → session →
//! backend → sink — against the echo stub and the drone model, including
//! the binding permutation, error propagation, and shutdown behavior.

use cosim_common::config::CosimConfig;
use cosim_common::model::{ModelBackend, ModelError};
use cosim_common::types::ChannelId;
use cosim_driver::driver::{CosimDriver, DriverError};
use cosim_driver::session::{SessionError, SessionState};
use cosim_driver::sink::CollectSink;
use cosim_model::builtin_registry;

/// Test configuration: gain 5, 100 Hz, optionally with identity bindings
/// instead of the deployment's y/z command permutation.
fn test_config(backend: &str, identity_bindings: bool) -> CosimConfig {
    let mut config = CosimConfig::default();
    config.shared.service_name = "cosim-test".to_string();
    config.model.backend = backend.to_string();
    if identity_bindings {
        config.bindings.command_y = "ycoord".to_string();
        config.bindings.command_z = "zcoord".to_string();
    }
    config.validate().unwrap();
    config
}

fn build_driver(config: &CosimConfig) -> CosimDriver {
    let registry = builtin_registry();
    let backend = registry.create(&config.model.backend).unwrap();
    CosimDriver::new(config, backend)
}

#[test]
fn echo_scenario_positive_x() {
    // gain=5, dt=0.01, one tick with positive-X at full deflection:
    // integrated target x = 0.05, echoed back unchanged.
    let config = test_config("echo", true);
    let mut driver = build_driver(&config);
    let channels = driver.channels();

    driver.start(0.0).unwrap();
    channels.activate(ChannelId::XPos, 1.0);

    let mut sink = CollectSink::new();
    driver.tick(&mut sink).unwrap();

    let position = sink.last().unwrap();
    assert!((position.x - 0.05).abs() < 1e-12);
    assert_eq!(position.y, 0.0);
    assert_eq!(position.z, 0.0);

    // A second tick integrates further.
    driver.tick(&mut sink).unwrap();
    assert!((sink.last().unwrap().x - 0.10).abs() < 1e-12);
    assert!((driver.sim_time() - 0.02).abs() < 1e-12);
}

#[test]
fn default_permutation_routes_y_intent_to_model_z() {
    // With the deployment bindings, the integrator's y accumulator lands
    // in the model's zcoord slot, so positive-Y intent surfaces on the
    // echoed z output.
    let config = test_config("echo", false);
    let mut driver = build_driver(&config);
    let channels = driver.channels();

    driver.start(0.0).unwrap();
    channels.activate(ChannelId::YPos, 1.0);

    let mut sink = CollectSink::new();
    driver.tick(&mut sink).unwrap();

    let position = sink.last().unwrap();
    assert_eq!(position.x, 0.0);
    assert_eq!(position.y, 0.0);
    assert!((position.z - 0.05).abs() < 1e-12);
}

#[test]
fn release_between_ticks_stops_integration() {
    let config = test_config("echo", true);
    let mut driver = build_driver(&config);
    let channels = driver.channels();

    driver.start(0.0).unwrap();
    channels.activate(ChannelId::XPos, 1.0);

    let mut sink = CollectSink::new();
    driver.tick(&mut sink).unwrap();
    assert!((sink.last().unwrap().x - 0.05).abs() < 1e-12);

    // Released between ticks: the next integration must see exactly zero.
    channels.release(ChannelId::XPos);
    driver.tick(&mut sink).unwrap();
    assert!((sink.last().unwrap().x - 0.05).abs() < 1e-12);
}

#[test]
fn tick_before_start_is_invalid_state() {
    let config = test_config("echo", true);
    let mut driver = build_driver(&config);

    let mut sink = CollectSink::new();
    let result = driver.tick(&mut sink);
    assert!(matches!(
        result,
        Err(DriverError::Session(SessionError::InvalidSessionState {
            ..
        }))
    ));
    assert!(sink.positions.is_empty());
}

#[test]
fn unknown_binding_surfaces_unmodified() {
    let mut config = test_config("echo", true);
    config.bindings.command_x = "throttle".to_string();

    let mut driver = build_driver(&config);
    driver.start(0.0).unwrap();

    let mut sink = CollectSink::new();
    let result = driver.tick(&mut sink);
    assert!(matches!(
        result,
        Err(DriverError::Session(SessionError::UnknownVariable(_)))
    ));
    assert!(sink.positions.is_empty());
}

#[test]
fn shutdown_is_idempotent() {
    let config = test_config("echo", true);
    let mut driver = build_driver(&config);
    driver.start(0.0).unwrap();

    let mut sink = CollectSink::new();
    driver.tick(&mut sink).unwrap();

    driver.shutdown();
    assert_eq!(driver.session_state(), SessionState::Terminated);
    driver.shutdown(); // guarded no-op

    // No further exchange after teardown.
    let result = driver.tick(&mut sink);
    assert!(matches!(result, Err(DriverError::Session(_))));
}

#[test]
fn drone_backend_full_pipeline() {
    let config = test_config("drone", true);
    let mut driver = build_driver(&config);
    let channels = driver.channels();

    driver.start(0.0).unwrap();
    channels.activate(ChannelId::XPos, 1.0);

    let mut sink = CollectSink::new();
    for _ in 0..100 {
        driver.tick(&mut sink).unwrap();
    }

    // One second of full positive-X deflection: the model chases a target
    // that has integrated out to 5.0 * 1.0s = 5.0, lagging behind it.
    let position = sink.last().unwrap();
    assert!(position.x > 0.0);
    assert!(position.x < 5.0);
    assert_eq!(position.y, 0.0);
    assert_eq!(position.z, 0.0);

    // Position is monotonically non-decreasing under constant positive command.
    for pair in sink.positions.windows(2) {
        assert!(pair[1].x >= pair[0].x);
    }
}

// ─── Step-failure propagation ───────────────────────────────────────

/// Backend whose step always fails once running.
struct FailingBackend;

impl ModelBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn version(&self) -> &'static str {
        "0.0.0"
    }

    fn instantiate(&mut self, _identifier: &str, _instance: &str) -> Result<(), ModelError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModelError> {
        Ok(())
    }

    fn setup_experiment(&mut self, _start: f64, _rate: u32) -> Result<(), ModelError> {
        Ok(())
    }

    fn enter_initialization(&mut self) -> Result<(), ModelError> {
        Ok(())
    }

    fn exit_initialization(&mut self) -> Result<(), ModelError> {
        Ok(())
    }

    fn set_real(&mut self, _name: &str, _value: f64) -> Result<(), ModelError> {
        Ok(())
    }

    fn get_real(&self, _name: &str) -> Result<f64, ModelError> {
        Ok(0.0)
    }

    fn do_step(&mut self, _time: f64, _dt: f64) -> Result<(), ModelError> {
        Err(ModelError::StepRejected("solver diverged".to_string()))
    }

    fn free_instance(&mut self) -> Result<(), ModelError> {
        Ok(())
    }
}

#[test]
fn step_failure_halts_run() {
    let config = test_config("echo", true);
    let mut driver = CosimDriver::new(&config, Box::new(FailingBackend));
    driver.start(0.0).unwrap();

    let mut sink = CollectSink::new();
    let result = driver.run(&mut sink);

    // The loop halts on the first rejected step and surfaces it —
    // no continuation with stale state, nothing reaches the sink.
    assert!(matches!(
        result,
        Err(DriverError::Session(SessionError::StepFailed(_)))
    ));
    assert!(sink.positions.is_empty());

    driver.shutdown();
    assert_eq!(driver.session_state(), SessionState::Terminated);
}
