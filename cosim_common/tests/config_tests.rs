//! Config loading tests.
//!
//! Tests for `CosimConfig::load()`: full-file parsing, section defaults,
//! missing-file detection, syntax error reporting, and semantic
//! validation of the binding permutation.

use cosim_common::config::{ConfigError, ConfigLoader, CosimConfig};
use cosim_common::types::Axis;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a complete cosim.toml into the given directory.
fn write_full_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("cosim.toml");
    fs::write(
        &path,
        r#"
[shared]
log_level = "debug"
service_name = "cosim-test-01"

[model]
backend = "echo"
identifier = "drone_hover"
instance_name = "bench-drone"

[control]
gain = 2.5
target_tick_rate = 250

[bindings]
command_x = "xcoord"
command_y = "ycoord"
command_z = "zcoord"
feedback_x = "xgps"
feedback_y = "ygps"
feedback_z = "zgps"
"#,
    )
    .unwrap();
    path
}

#[test]
fn load_full_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_full_config(tmp.path());

    let config = CosimConfig::load(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.shared.service_name, "cosim-test-01");
    assert_eq!(config.model.backend, "echo");
    assert_eq!(config.model.instance_name, "bench-drone");
    assert_eq!(config.control.gain, 2.5);
    assert_eq!(config.control.target_tick_rate, 250);
    // Identity bindings override the permuted defaults.
    assert_eq!(config.bindings.command(Axis::Y), "ycoord");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cosim.toml");
    fs::write(
        &path,
        r#"
[shared]
service_name = "cosim-minimal"
"#,
    )
    .unwrap();

    let config = CosimConfig::load(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.control.gain, 5.0);
    assert_eq!(config.control.target_tick_rate, 100);
    assert_eq!(config.model.backend, "drone");
    // Deployment default keeps the y/z command permutation.
    assert_eq!(config.bindings.command(Axis::Y), "zcoord");
    assert_eq!(config.bindings.command(Axis::Z), "ycoord");
}

#[test]
fn missing_file_is_file_not_found() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("does_not_exist.toml");

    let result = CosimConfig::load(&path);
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cosim.toml");
    fs::write(&path, "[control\ngain = ").unwrap();

    let result = CosimConfig::load(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn invalid_gain_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cosim.toml");
    fs::write(
        &path,
        r#"
[shared]
service_name = "cosim-bad-gain"

[control]
gain = -1.0
"#,
    )
    .unwrap();

    let config = CosimConfig::load(&path).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn duplicate_command_binding_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cosim.toml");
    fs::write(
        &path,
        r#"
[shared]
service_name = "cosim-dup-binding"

[bindings]
command_x = "xcoord"
command_y = "xcoord"
"#,
    )
    .unwrap();

    let config = CosimConfig::load(&path).unwrap();
    assert!(config.validate().is_err());
}
