//! Headless [`AudioGraph`] and [`SceneEngine`] implementations.

use super::{AudioGraph, AudioParam, NodeId, NodeKind, SceneEngine, SceneSourceId, SourceOptions};
use crate::error::{Result, RoomSonicError};
use crate::math::Vec3;
use crate::scene::RoomProperties;
use std::collections::HashMap;

/// A stage recorded by [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub kind: NodeKind,
    /// Only set for delay stages
    pub max_delay: Option<f32>,
    params: HashMap<AudioParam, f32>,
}

impl GraphNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            max_delay: None,
            params: HashMap::new(),
        }
    }

    pub fn param(&self, param: AudioParam) -> Option<f32> {
        self.params.get(&param).copied()
    }
}

/// Audio graph that stores nodes, connections and parameter values in memory.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    next_node_id: u64,
    nodes: HashMap<NodeId, GraphNode>,
    connections: Vec<(NodeId, NodeId)>,
    param_writes: usize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, node: GraphNode) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut GraphNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| RoomSonicError::Engine(format!("{} does not exist", id)))
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn param(&self, id: NodeId, param: AudioParam) -> Option<f32> {
        self.nodes.get(&id).and_then(|node| node.param(param))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connections(&self) -> &[(NodeId, NodeId)] {
        &self.connections
    }

    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.connections.contains(&(from, to))
    }

    /// Number of successful `set_param` calls, excluding stage construction.
    pub fn param_writes(&self) -> usize {
        self.param_writes
    }
}

impl AudioGraph for MemoryGraph {
    fn create_gain(&mut self, gain: f32) -> Result<NodeId> {
        let mut node = GraphNode::new(NodeKind::Gain);
        node.params.insert(AudioParam::Gain, gain);
        Ok(self.add_node(node))
    }

    fn create_lowpass(&mut self, cutoff_hz: f32, q: f32) -> Result<NodeId> {
        let mut node = GraphNode::new(NodeKind::Lowpass);
        node.params.insert(AudioParam::Frequency, cutoff_hz);
        node.params.insert(AudioParam::Q, q);
        Ok(self.add_node(node))
    }

    fn create_delay(&mut self, max_duration_secs: f32) -> Result<NodeId> {
        if max_duration_secs.is_nan() || max_duration_secs <= 0.0 {
            return Err(RoomSonicError::Engine(format!(
                "Delay stage needs a positive maximum duration, got {}",
                max_duration_secs
            )));
        }
        let mut node = GraphNode::new(NodeKind::Delay);
        node.max_delay = Some(max_duration_secs);
        node.params.insert(AudioParam::DelayTime, 0.0);
        Ok(self.add_node(node))
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        for id in [from, to] {
            if !self.nodes.contains_key(&id) {
                return Err(RoomSonicError::Engine(format!(
                    "Cannot connect {} -> {}: {} does not exist",
                    from, to, id
                )));
            }
        }
        self.connections.push((from, to));
        Ok(())
    }

    fn set_param(&mut self, id: NodeId, param: AudioParam, value: f32) -> Result<()> {
        let node = self.node_mut(id)?;
        if !param.applies_to(node.kind) {
            return Err(RoomSonicError::Engine(format!(
                "{:?} stage {} has no {:?} parameter",
                node.kind, id, param
            )));
        }
        node.params.insert(param, value);
        self.param_writes += 1;
        Ok(())
    }
}

/// A source registered with [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSourceRecord {
    pub input: NodeId,
    pub options: SourceOptions,
    pub position: Vec3,
}

/// Scene engine that stores the room, listener and sources in memory.
#[derive(Debug, Default)]
pub struct MemoryScene {
    ambisonic_order: u32,
    room: Option<RoomProperties>,
    room_updates: usize,
    listener_position: Vec3,
    sources: Vec<SceneSourceRecord>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ambisonic_order(&self) -> u32 {
        self.ambisonic_order
    }

    pub fn room(&self) -> Option<&RoomProperties> {
        self.room.as_ref()
    }

    /// How many times room properties have been pushed.
    pub fn room_updates(&self) -> usize {
        self.room_updates
    }

    pub fn listener_position(&self) -> Vec3 {
        self.listener_position
    }

    pub fn source(&self, id: SceneSourceId) -> Option<&SceneSourceRecord> {
        self.sources.get(id.raw() as usize)
    }

    pub fn sources(&self) -> &[SceneSourceRecord] {
        &self.sources
    }
}

impl SceneEngine for MemoryScene {
    fn set_ambisonic_order(&mut self, order: u32) -> Result<()> {
        self.ambisonic_order = order;
        Ok(())
    }

    fn set_room_properties(&mut self, room: &RoomProperties) -> Result<()> {
        self.room = Some(room.clone());
        self.room_updates += 1;
        Ok(())
    }

    fn create_source(&mut self, input: NodeId, options: &SourceOptions) -> Result<SceneSourceId> {
        let id = SceneSourceId::new(self.sources.len() as u64);
        self.sources.push(SceneSourceRecord {
            input,
            options: options.clone(),
            position: Vec3::ZERO,
        });
        Ok(id)
    }

    fn set_listener_position(&mut self, position: Vec3) -> Result<()> {
        self.listener_position = position;
        Ok(())
    }

    fn set_source_position(&mut self, source: SceneSourceId, position: Vec3) -> Result<()> {
        let record = self
            .sources
            .get_mut(source.raw() as usize)
            .ok_or_else(|| RoomSonicError::Engine(format!("{} does not exist", source)))?;
        record.position = position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_records_nodes_and_params() {
        let mut graph = MemoryGraph::new();
        let gain = graph.create_gain(1.0).unwrap();
        let lowpass = graph.create_lowpass(6400.0, 0.0).unwrap();

        graph.connect(gain, lowpass).unwrap();
        graph.set_param(lowpass, AudioParam::Frequency, 400.0).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_connected(gain, lowpass));
        assert!(!graph.is_connected(lowpass, gain));
        assert_eq!(graph.param(lowpass, AudioParam::Frequency), Some(400.0));
        assert_eq!(graph.param(lowpass, AudioParam::Q), Some(0.0));
        assert_eq!(graph.param_writes(), 1);
    }

    #[test]
    fn test_graph_rejects_mismatched_param() {
        let mut graph = MemoryGraph::new();
        let delay = graph.create_delay(3.0).unwrap();
        assert!(graph.set_param(delay, AudioParam::Gain, 0.5).is_err());
        assert!(graph.set_param(delay, AudioParam::DelayTime, 0.09).is_ok());
        assert_eq!(graph.node(delay).unwrap().max_delay, Some(3.0));
    }

    #[test]
    fn test_graph_rejects_unknown_nodes() {
        let mut graph = MemoryGraph::new();
        let gain = graph.create_gain(1.0).unwrap();
        assert!(graph.connect(gain, NodeId::new(42)).is_err());
        assert!(graph.set_param(NodeId::new(42), AudioParam::Gain, 1.0).is_err());
        assert!(graph.create_delay(0.0).is_err());
    }

    #[test]
    fn test_scene_tracks_sources() {
        let mut scene = MemoryScene::new();
        let id = scene
            .create_source(NodeId::new(7), &SourceOptions::default())
            .unwrap();
        scene.set_source_position(id, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        scene.set_listener_position(Vec3::X).unwrap();

        assert_eq!(scene.source(id).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.source(id).unwrap().input, NodeId::new(7));
        assert_eq!(scene.listener_position(), Vec3::X);
        assert!(
            scene
                .set_source_position(SceneSourceId::new(5), Vec3::ZERO)
                .is_err()
        );
    }
}
