//! Command integration.
//!
//! Turns per-tick axis commands into an accumulated target position —
//! operator intent, not physical truth. Pure accumulation: no decay, no
//! clamping of the accumulator itself (only the input channels are
//! bounded).

use cosim_common::types::{Axis, AxisCommand, IntegratedPosition};

/// Integrates axis commands over elapsed time into a target position.
///
/// Owns the accumulator exclusively; the driver reads the returned value
/// but never writes it.
#[derive(Debug, Clone, Copy)]
pub struct CommandIntegrator {
    gain: f64,
    accumulator: IntegratedPosition,
}

impl CommandIntegrator {
    /// Create an integrator with the given command gain.
    pub fn new(gain: f64) -> Self {
        Self {
            gain,
            accumulator: IntegratedPosition::default(),
        }
    }

    /// Integrate one tick of commands.
    ///
    /// For each axis: `accumulator += gain * dt * (pos - neg)`.
    /// Called exactly once per fixed tick, after the input snapshot and
    /// before the model set-phase.
    pub fn integrate(&mut self, dt: f64, command: &AxisCommand) -> IntegratedPosition {
        for axis in Axis::ALL {
            self.accumulator.add(axis, self.gain * dt * command.net(axis));
        }
        self.accumulator
    }

    /// Current accumulator value without integrating.
    #[inline]
    pub fn position(&self) -> IntegratedPosition {
        self.accumulator
    }

    /// Configured command gain.
    #[inline]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Reset the accumulator to the origin.
    pub fn reset(&mut self) {
        self.accumulator = IntegratedPosition::default();
    }
}
