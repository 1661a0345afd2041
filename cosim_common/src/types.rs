//! Value types exchanged between the input, integration, and model layers.
//!
//! All types are plain owned data passed by value or exclusive reference
//! between components — no ambient shared mutable state. Enums use
//! `#[repr(u8)]` for compact layout and stable raw conversion.

use serde::{Deserialize, Serialize};

use crate::consts::CHANNEL_COUNT;

// ─── Axis / Channel Identifiers ─────────────────────────────────────

/// Spatial axis identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    /// Lateral axis.
    X = 0,
    /// Vertical axis.
    Y = 1,
    /// Longitudinal axis.
    Z = 2,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }
}

/// Directional input channel — one of six, paired into three opposing
/// axis pairs.
///
/// Channel identifiers are the names the raw input source uses when
/// delivering `activate`/`release` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelId {
    /// Negative X direction.
    XNeg = 0,
    /// Positive X direction.
    XPos = 1,
    /// Negative Y direction.
    YNeg = 2,
    /// Positive Y direction.
    YPos = 3,
    /// Negative Z direction.
    ZNeg = 4,
    /// Positive Z direction.
    ZPos = 5,
}

impl ChannelId {
    /// All channels in canonical order.
    pub const ALL: [ChannelId; CHANNEL_COUNT] = [
        ChannelId::XNeg,
        ChannelId::XPos,
        ChannelId::YNeg,
        ChannelId::YPos,
        ChannelId::ZNeg,
        ChannelId::ZPos,
    ];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::XNeg),
            1 => Some(Self::XPos),
            2 => Some(Self::YNeg),
            3 => Some(Self::YPos),
            4 => Some(Self::ZNeg),
            5 => Some(Self::ZPos),
            _ => None,
        }
    }

    /// The spatial axis this channel belongs to.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Self::XNeg | Self::XPos => Axis::X,
            Self::YNeg | Self::YPos => Axis::Y,
            Self::ZNeg | Self::ZPos => Axis::Z,
        }
    }

    /// Returns true for the positive member of the axis pair.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::XPos | Self::YPos | Self::ZPos)
    }

    /// Array index for channel-indexed storage.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ─── Command / Position Values ──────────────────────────────────────

/// Snapshot of the six directional channel values, each in `[0, 1]`.
///
/// A released channel reads exactly `0.0` — absence of an active press
/// never retains the last nonzero value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisCommand {
    /// Channel values indexed by [`ChannelId::index`].
    pub channels: [f64; CHANNEL_COUNT],
}

impl AxisCommand {
    /// Value of a single channel.
    #[inline]
    pub fn get(&self, channel: ChannelId) -> f64 {
        self.channels[channel.index()]
    }

    /// Set a single channel value (no range enforcement — the input
    /// aggregator clamps at its boundary).
    #[inline]
    pub fn set(&mut self, channel: ChannelId, value: f64) {
        self.channels[channel.index()] = value;
    }

    /// Net command for one axis: positive channel minus negative channel.
    #[inline]
    pub fn net(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.get(ChannelId::XPos) - self.get(ChannelId::XNeg),
            Axis::Y => self.get(ChannelId::YPos) - self.get(ChannelId::YNeg),
            Axis::Z => self.get(ChannelId::ZPos) - self.get(ChannelId::ZNeg),
        }
    }
}

/// Accumulated operator intent — the integrated target position.
///
/// Distinct from the model's own simulated position. Owned exclusively
/// by the command integrator; the driver only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegratedPosition {
    /// Accumulated X target.
    pub x: f64,
    /// Accumulated Y target.
    pub y: f64,
    /// Accumulated Z target.
    pub z: f64,
}

impl IntegratedPosition {
    /// Accumulator value for one axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Add a delta to one axis accumulator.
    #[inline]
    pub fn add(&mut self, axis: Axis, delta: f64) {
        match axis {
            Axis::X => self.x += delta,
            Axis::Y => self.y += delta,
            Axis::Z => self.z += delta,
        }
    }
}

/// Model position output for one tick.
///
/// Overwritten every tick and consumed immediately by the position sink —
/// never retained as history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResultPosition {
    /// Model X position.
    pub x: f64,
    /// Model Y position.
    pub y: f64,
    /// Model Z position.
    pub z: f64,
}
