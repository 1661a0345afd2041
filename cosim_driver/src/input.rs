//! Six-channel input aggregation.
//!
//! `InputChannels` is the explicit channel-state table behind the
//! `activate`/`release` interface. An asynchronous input source (device
//! polling, event callbacks) writes individual channels at arbitrary
//! times; the driver reads a coherent snapshot once at the start of each
//! tick. Values are word-sized atomics, so a channel write landing
//! between ticks is fully visible to the next sample — never dropped,
//! never torn.

use std::sync::atomic::{AtomicU64, Ordering};

use cosim_common::consts::CHANNEL_COUNT;
use cosim_common::types::{AxisCommand, ChannelId};

/// Shared table of the six directional channel values.
///
/// Each slot stores an `f64` bit-pattern in an `AtomicU64`. Single writer
/// per channel (the input source), single reader (the driver at tick
/// start) — no locks.
#[derive(Debug, Default)]
pub struct InputChannels {
    channels: [AtomicU64; CHANNEL_COUNT],
}

impl InputChannels {
    /// Create a table with all channels released (zero).
    pub fn new() -> Self {
        Self {
            channels: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Set a channel to `value`, clamped to `[0, 1]`.
    ///
    /// Non-finite input is treated as a released channel.
    pub fn activate(&self, channel: ChannelId, value: f64) {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.channels[channel.index()].store(value.to_bits(), Ordering::SeqCst);
    }

    /// Set a channel to exactly zero.
    ///
    /// Must be delivered whenever the source signal is released — a
    /// released channel never retains its last nonzero value.
    pub fn release(&self, channel: ChannelId) {
        self.channels[channel.index()].store(0.0f64.to_bits(), Ordering::SeqCst);
    }

    /// Current value of a single channel.
    pub fn get(&self, channel: ChannelId) -> f64 {
        f64::from_bits(self.channels[channel.index()].load(Ordering::SeqCst))
    }

    /// Snapshot all six channels for this tick.
    pub fn sample(&self) -> AxisCommand {
        let mut command = AxisCommand::default();
        for channel in ChannelId::ALL {
            command.set(channel, self.get(channel));
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosim_common::types::Axis;

    #[test]
    fn last_write_wins() {
        let channels = InputChannels::new();
        channels.activate(ChannelId::XPos, 0.3);
        channels.activate(ChannelId::XPos, 0.8);
        assert_eq!(channels.get(ChannelId::XPos), 0.8);
    }

    #[test]
    fn release_zeroes_exactly() {
        let channels = InputChannels::new();
        channels.activate(ChannelId::YNeg, 1.0);
        assert_eq!(channels.get(ChannelId::YNeg), 1.0);

        channels.release(ChannelId::YNeg);
        assert_eq!(channels.get(ChannelId::YNeg), 0.0);

        // Release with no prior activation is also exactly zero.
        channels.release(ChannelId::ZPos);
        assert_eq!(channels.get(ChannelId::ZPos), 0.0);
    }

    #[test]
    fn out_of_range_clamped() {
        let channels = InputChannels::new();
        channels.activate(ChannelId::ZNeg, 2.5);
        assert_eq!(channels.get(ChannelId::ZNeg), 1.0);

        channels.activate(ChannelId::ZNeg, -0.5);
        assert_eq!(channels.get(ChannelId::ZNeg), 0.0);

        channels.activate(ChannelId::ZNeg, f64::NAN);
        assert_eq!(channels.get(ChannelId::ZNeg), 0.0);
    }

    #[test]
    fn sample_reflects_all_channels() {
        let channels = InputChannels::new();
        channels.activate(ChannelId::XPos, 1.0);
        channels.activate(ChannelId::YNeg, 0.5);

        let command = channels.sample();
        assert_eq!(command.get(ChannelId::XPos), 1.0);
        assert_eq!(command.net(Axis::X), 1.0);
        assert_eq!(command.net(Axis::Y), -0.5);
        assert_eq!(command.net(Axis::Z), 0.0);
    }

    #[test]
    fn channels_independent() {
        let channels = InputChannels::new();
        for channel in ChannelId::ALL {
            channels.activate(channel, 0.7);
        }
        channels.release(ChannelId::XNeg);

        assert_eq!(channels.get(ChannelId::XNeg), 0.0);
        for channel in [
            ChannelId::XPos,
            ChannelId::YNeg,
            ChannelId::YPos,
            ChannelId::ZNeg,
            ChannelId::ZPos,
        ] {
            assert_eq!(channels.get(channel), 0.7);
        }
    }
}
