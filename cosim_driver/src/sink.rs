//! Position sink seam.
//!
//! The consuming layer (rendering, actuation) receives the model's
//! resulting position once per tick through this trait. Sinks must not
//! block the driver.

use cosim_common::types::ResultPosition;
use tracing::debug;

/// Receives the resulting position once per tick.
pub trait PositionSink {
    /// Accept this tick's position. Must return promptly.
    fn accept(&mut self, position: ResultPosition);
}

/// Sink that logs positions at a throttled rate.
///
/// Emits one `debug!` line every `interval` ticks, so a 100 Hz loop with
/// `interval = 100` logs once per simulated second.
#[derive(Debug)]
pub struct LogSink {
    interval: u64,
    count: u64,
}

impl LogSink {
    /// Create a sink logging every `interval` ticks (minimum 1).
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
        }
    }
}

impl PositionSink for LogSink {
    fn accept(&mut self, position: ResultPosition) {
        if self.count % self.interval == 0 {
            debug!(
                "Position: X={:.3} Y={:.3} Z={:.3}",
                position.x, position.y, position.z
            );
        }
        self.count += 1;
    }
}

/// Sink that collects every position it receives.
///
/// Intended for tests and offline analysis of short runs.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Positions in arrival order.
    pub positions: Vec<ResultPosition>,
}

impl CollectSink {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last position received, if any.
    pub fn last(&self) -> Option<ResultPosition> {
        self.positions.last().copied()
    }
}

impl PositionSink for CollectSink {
    fn accept(&mut self, position: ResultPosition) {
        self.positions.push(position);
    }
}
