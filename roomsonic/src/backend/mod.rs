//! Capabilities RoomSonic drives but does not implement.
//!
//! RoomSonic computes *what* the signal chain and the scene should look like;
//! the actual audio graph (gain, filter and delay stages) and the spatial scene
//! engine (room simulation, ambisonic encoding, listener rendering) live behind
//! the [`AudioGraph`] and [`SceneEngine`] traits.
//!
//! The [`memory`] module provides headless implementations that simply record
//! every node, connection and write, which is enough to drive a session
//! without an audio device.

pub mod memory;

use crate::error::Result;
use crate::math::Vec3;
use crate::scene::RoomProperties;
use std::fmt;

pub use memory::{GraphNode, MemoryGraph, MemoryScene, SceneSourceRecord};

/// Handle to a stage created in an [`AudioGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Gain,
    Lowpass,
    Delay,
}

/// Scalar parameters exposed by graph stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioParam {
    /// Linear gain of a gain stage
    Gain,
    /// Cutoff frequency (Hz) of a low-pass stage
    Frequency,
    /// Resonance of a low-pass stage
    Q,
    /// Delay time (seconds) of a delay stage
    DelayTime,
}

impl AudioParam {
    /// Whether a stage of `kind` exposes this parameter.
    pub fn applies_to(self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (AudioParam::Gain, NodeKind::Gain)
                | (AudioParam::Frequency, NodeKind::Lowpass)
                | (AudioParam::Q, NodeKind::Lowpass)
                | (AudioParam::DelayTime, NodeKind::Delay)
        )
    }
}

/// The audio-graph runtime: creates stages, wires them and writes their parameters.
///
/// All writes are expected to be cheap, non-blocking scalar assignments.
pub trait AudioGraph {
    fn create_gain(&mut self, gain: f32) -> Result<NodeId>;

    fn create_lowpass(&mut self, cutoff_hz: f32, q: f32) -> Result<NodeId>;

    /// Creates a delay stage whose delay time can never exceed `max_duration_secs`.
    fn create_delay(&mut self, max_duration_secs: f32) -> Result<NodeId>;

    /// Routes the output of `from` into the input of `to`.
    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()>;

    fn set_param(&mut self, node: NodeId, param: AudioParam, value: f32) -> Result<()>;
}

/// Handle to a source registered with a [`SceneEngine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneSourceId(u64);

impl SceneSourceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneSourceId({})", self.0)
    }
}

/// Distance rolloff model applied by the scene engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rolloff {
    #[default]
    Logarithmic,
    Linear,
    /// No distance attenuation; the attenuation stage handles it manually
    None,
}

/// Options passed to [`SceneEngine::create_source`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceOptions {
    pub rolloff: Rolloff,
}

impl SourceOptions {
    pub fn with_rolloff(rolloff: Rolloff) -> Self {
        Self { rolloff }
    }
}

/// The spatial scene engine that renders sources around a listener in a room.
pub trait SceneEngine {
    /// Opaque encoding resolution of the engine.
    fn set_ambisonic_order(&mut self, order: u32) -> Result<()>;

    /// Replaces the simulated room as a whole.
    fn set_room_properties(&mut self, room: &RoomProperties) -> Result<()>;

    /// Registers a source fed by the graph stage `input`.
    fn create_source(&mut self, input: NodeId, options: &SourceOptions) -> Result<SceneSourceId>;

    fn set_listener_position(&mut self, position: Vec3) -> Result<()>;

    fn set_source_position(&mut self, source: SceneSourceId, position: Vec3) -> Result<()>;
}
