//! Fixed-tick co-simulation loop.
//!
//! Implements the per-tick orchestration binding input sampling, command
//! integration, and model exchange together, plus the pacing loop that
//! invokes it at the configured cadence.
//!
//! ## Tick Body
//! Sample channels → integrate → set commands → step → get positions →
//! emit to sink. The five phases execute strictly in sequence; no second
//! tick is ever in flight.
//!
//! ## Pacing
//! Default builds pace with `Instant` + `std::thread::sleep`. With the
//! `rt` feature the loop uses `clock_nanosleep(TIMER_ABSTIME)` on
//! `CLOCK_MONOTONIC` for drift-free absolute-time pacing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cosim_common::config::{BindingConfig, CosimConfig};
use cosim_common::model::ModelBackend;
use cosim_common::types::{Axis, ResultPosition};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::input::InputChannels;
use crate::integrator::CommandIntegrator;
use crate::session::{ModelSession, SessionError, SessionState};
use crate::sink::PositionSink;

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick timing statistics.
///
/// Updated every tick with no allocation. Provides min/max/avg for
/// tick latency monitoring and overrun detection.
#[derive(Debug, Clone)]
pub struct TickStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: i64,
    /// Minimum tick duration [ns].
    pub min_tick_ns: i64,
    /// Maximum tick duration [ns].
    pub max_tick_ns: i64,
    /// Running sum for average computation.
    pub sum_tick_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
}

impl TickStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: i64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            overruns: 0,
        }
    }

    /// Record a tick duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        if duration_ns < self.min_tick_ns {
            self.min_tick_ns = duration_ns;
        }
        if duration_ns > self.max_tick_ns {
            self.max_tick_ns = duration_ns;
        }
        self.sum_tick_ns += duration_ns;
    }

    /// Average tick time [ns] (returns 0 if no ticks).
    #[inline]
    pub fn avg_tick_ns(&self) -> i64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count as i64
        }
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors during driver execution.
///
/// Session errors cross the driver unmodified — nothing is retried, and
/// the loop halts on the first failure rather than continuing with stale
/// model state.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Session error surfaced from the tick body.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Pacing clock failure.
    #[error("pacing error: {0}")]
    Pacing(String),
}

// ─── Driver ─────────────────────────────────────────────────────────

/// The fixed-tick co-simulation driver.
///
/// Owns the model session, the command integrator, the shared input
/// channel table, and the timing infrastructure. `run()` enters the
/// pacing loop; `tick()` executes one tick body.
pub struct CosimDriver {
    session: ModelSession,
    integrator: CommandIntegrator,
    channels: Arc<InputChannels>,
    bindings: BindingConfig,
    /// Fixed simulated time increment per tick [s].
    dt: f64,
    /// Tick budget [ns], also the pacing period.
    tick_budget_ns: i64,
    tick_period: Duration,
    /// Simulated clock, advanced by `dt` on every successful step.
    sim_time: f64,
    running: Arc<AtomicBool>,
    stats: TickStats,
}

impl CosimDriver {
    /// Create a driver from a validated configuration and a backend.
    ///
    /// The backend is handed to the session uninstantiated; call
    /// [`CosimDriver::start`] before ticking.
    pub fn new(config: &CosimConfig, backend: Box<dyn ModelBackend>) -> Self {
        let session = ModelSession::new(
            backend,
            config.model.identifier.clone(),
            config.model.instance_name.clone(),
            config.control.target_tick_rate,
        );
        let dt = config.control.dt();
        let tick_budget_ns = 1_000_000_000 / i64::from(config.control.target_tick_rate);

        Self {
            session,
            integrator: CommandIntegrator::new(config.control.gain),
            channels: Arc::new(InputChannels::new()),
            bindings: config.bindings.clone(),
            dt,
            tick_budget_ns,
            tick_period: Duration::from_nanos(tick_budget_ns as u64),
            sim_time: 0.0,
            running: Arc::new(AtomicBool::new(false)),
            stats: TickStats::new(),
        }
    }

    /// Bring the model session up, starting simulated time at `start_time`.
    pub fn start(&mut self, start_time: f64) -> Result<(), DriverError> {
        self.session.start(start_time)?;
        self.sim_time = start_time;
        Ok(())
    }

    /// Shared input channel table for the raw input source to write.
    pub fn channels(&self) -> Arc<InputChannels> {
        Arc::clone(&self.channels)
    }

    /// Running flag for signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Request the pacing loop to stop before its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Tick statistics.
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Current session lifecycle state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Current simulated time [s].
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Execute one tick body.
    ///
    /// Phases, strictly in sequence:
    /// 1. Snapshot the input channels.
    /// 2. Integrate this tick's `dt` into the target position.
    /// 3. Write the three command bindings into the model.
    /// 4. Step the model by exactly `dt`.
    /// 5. Read the three feedback bindings.
    /// 6. Emit the result to the sink.
    ///
    /// # Errors
    /// Any session error aborts the tick immediately and propagates;
    /// simulated time only advances on a successful step.
    pub fn tick(&mut self, sink: &mut dyn PositionSink) -> Result<(), DriverError> {
        let command = self.channels.sample();
        let target = self.integrator.integrate(self.dt, &command);

        for axis in Axis::ALL {
            self.session
                .set_variable(self.bindings.command(axis), target.get(axis))?;
        }

        self.session.step(self.sim_time, self.dt)?;
        self.sim_time += self.dt;

        let position = ResultPosition {
            x: self.session.get_variable(self.bindings.feedback(Axis::X))?,
            y: self.session.get_variable(self.bindings.feedback(Axis::Y))?,
            z: self.session.get_variable(self.bindings.feedback(Axis::Z))?,
        };

        sink.accept(position);
        Ok(())
    }

    /// Enter the fixed-cadence loop.
    ///
    /// Blocks until [`CosimDriver::stop`] is called (e.g. from a signal
    /// handler) or the tick body fails. A tick failure halts the loop
    /// immediately — the failure is surfaced, never absorbed.
    pub fn run(&mut self, sink: &mut dyn PositionSink) -> Result<(), DriverError> {
        self.running.store(true, Ordering::SeqCst);
        info!(
            "Starting co-simulation loop ({} ns tick budget, dt={:.4}s)",
            self.tick_budget_ns, self.dt
        );

        if detect_rt_mode() {
            info!("Running under a real-time scheduling policy");
        } else {
            info!("Running under the standard scheduler");
        }

        let result = {
            #[cfg(feature = "rt")]
            {
                self.run_rt_loop(sink)
            }

            #[cfg(not(feature = "rt"))]
            {
                self.run_std_loop(sink)
            }
        };

        info!(
            "Co-simulation loop stopped after {} ticks (overruns: {})",
            self.stats.tick_count, self.stats.overruns
        );
        result
    }

    /// Stop the loop and tear the session down. Idempotent.
    pub fn shutdown(&mut self) {
        self.stop();
        self.session.teardown();
    }

    /// Standard pacing loop using `Instant` + `std::thread::sleep`.
    #[cfg(not(feature = "rt"))]
    fn run_std_loop(&mut self, sink: &mut dyn PositionSink) -> Result<(), DriverError> {
        use std::time::Instant;

        while self.running.load(Ordering::SeqCst) {
            let tick_start = Instant::now();

            self.tick(sink)?;

            let elapsed = tick_start.elapsed();
            let duration_ns = elapsed.as_nanos() as i64;
            self.stats.record(duration_ns);

            if duration_ns > self.tick_budget_ns {
                self.stats.overruns += 1;
                if self.stats.overruns <= 10 || self.stats.overruns % 1000 == 0 {
                    warn!(
                        "Tick overrun #{}: {}ns > {}ns budget",
                        self.stats.overruns, duration_ns, self.tick_budget_ns
                    );
                }
            }

            if let Some(remaining) = self.tick_period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }

            if self.stats.tick_count % 1000 == 0 {
                debug!(
                    "Loop: {} ticks, avg={}ns, max={}ns, overruns={}",
                    self.stats.tick_count,
                    self.stats.avg_tick_ns(),
                    self.stats.max_tick_ns,
                    self.stats.overruns
                );
            }
        }
        Ok(())
    }

    /// RT pacing loop using `clock_nanosleep(TIMER_ABSTIME)`.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self, sink: &mut dyn PositionSink) -> Result<(), DriverError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let mut next_wake = clock_gettime(clock)
            .map_err(|e| DriverError::Pacing(format!("clock_gettime: {e}")))?;

        while self.running.load(Ordering::SeqCst) {
            // Advance next wake time.
            next_wake = timespec_add_ns(next_wake, self.tick_budget_ns);

            let tick_start = clock_gettime(clock)
                .map_err(|e| DriverError::Pacing(format!("clock_gettime: {e}")))?;

            self.tick(sink)?;

            let tick_end = clock_gettime(clock)
                .map_err(|e| DriverError::Pacing(format!("clock_gettime: {e}")))?;
            let duration_ns = timespec_diff_ns(&tick_end, &tick_start);
            self.stats.record(duration_ns);

            if duration_ns > self.tick_budget_ns {
                self.stats.overruns += 1;
                if self.stats.overruns <= 10 || self.stats.overruns % 1000 == 0 {
                    warn!(
                        "Tick overrun #{}: {}ns > {}ns budget",
                        self.stats.overruns, duration_ns, self.tick_budget_ns
                    );
                }
            }

            if self.stats.tick_count % 1000 == 0 {
                debug!(
                    "Loop: {} ticks, avg={}ns, max={}ns, overruns={}",
                    self.stats.tick_count,
                    self.stats.avg_tick_ns(),
                    self.stats.max_tick_ns,
                    self.stats.overruns
                );
            }

            // Sleep until the next tick boundary (absolute time).
            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }
}

// ─── Time Helpers ───────────────────────────────────────────────────

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Compute the difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

/// Detect if running under a real-time scheduler policy.
fn detect_rt_mode() -> bool {
    #[cfg(target_os = "linux")]
    {
        use libc::{SCHED_FIFO, SCHED_RR, sched_getscheduler};
        unsafe {
            let policy = sched_getscheduler(0);
            policy == SCHED_FIFO || policy == SCHED_RR
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_stats_basic() {
        let mut stats = TickStats::new();
        assert_eq!(stats.tick_count, 0);
        assert_eq!(stats.avg_tick_ns(), 0);

        stats.record(500_000);
        assert_eq!(stats.tick_count, 1);
        assert_eq!(stats.last_tick_ns, 500_000);
        assert_eq!(stats.min_tick_ns, 500_000);
        assert_eq!(stats.max_tick_ns, 500_000);
        assert_eq!(stats.avg_tick_ns(), 500_000);

        stats.record(600_000);
        assert_eq!(stats.tick_count, 2);
        assert_eq!(stats.min_tick_ns, 500_000);
        assert_eq!(stats.max_tick_ns, 600_000);
        assert_eq!(stats.avg_tick_ns(), 550_000);
    }

    #[test]
    fn driver_error_display() {
        let err = DriverError::Pacing("clock unavailable".to_string());
        assert!(err.to_string().contains("clock unavailable"));
    }
}
