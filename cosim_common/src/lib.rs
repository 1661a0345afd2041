//! Cosim Common Library
//!
//! This crate provides the shared types, the model backend contract, and
//! configuration loading utilities for all cosim workspace crates.
//!
//! # Module Structure
//!
//! - [`types`] - Value types exchanged between input, integration, and model layers
//! - [`model`] - Model backend trait and error types
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - System-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! cosim = { package = "cosim_common", path = "../cosim_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use cosim_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod model;
pub mod prelude;
pub mod types;
