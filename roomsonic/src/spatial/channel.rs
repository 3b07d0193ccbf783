use crate::backend::{AudioGraph, NodeId, SceneEngine, SceneSourceId, SourceOptions};
use crate::controls::ControlParameter;
use crate::error::Result;
use crate::math::Vec3;
use crate::preset::ParameterBundle;
use crate::spatial::attenuation::{AttenuationControl, AttenuationSettings};
use crate::spatial::reverb::{ReverbChain, ReverbSettings};

/// One sound source: its scene handle, position and owned signal chain.
///
/// Signal path: reverb chain -> attenuation gain -> general low-pass -> scene source.
#[derive(Debug, Clone)]
pub struct SoundSourceChannel {
    index: usize,
    scene_source: SceneSourceId,
    position: Vec3,
    reverb: ReverbChain,
    attenuation: AttenuationControl,
}

impl SoundSourceChannel {
    pub(crate) fn build(
        index: usize,
        graph: &mut dyn AudioGraph,
        scene: &mut dyn SceneEngine,
        options: &SourceOptions,
        max_delay: f32,
    ) -> Result<Self> {
        let reverb = ReverbChain::build(graph, max_delay)?;
        let attenuation = AttenuationControl::build(graph)?;
        graph.connect(reverb.output(), attenuation.input())?;

        let scene_source = scene.create_source(attenuation.output(), options)?;
        log::debug!("Source {} registered as {}", index, scene_source);

        Ok(Self {
            index,
            scene_source,
            position: Vec3::ZERO,
            reverb,
            attenuation,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scene_source(&self) -> SceneSourceId {
        self.scene_source
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn reverb(&self) -> ReverbSettings {
        self.reverb.settings()
    }

    pub fn attenuation(&self) -> AttenuationSettings {
        self.attenuation.settings()
    }

    /// Graph stage the source's signal must be connected to.
    pub fn input(&self) -> NodeId {
        self.reverb.input()
    }

    pub(crate) fn set_position(&mut self, scene: &mut dyn SceneEngine, position: Vec3) -> Result<()> {
        scene.set_source_position(self.scene_source, position)?;
        self.position = position;
        Ok(())
    }

    /// Current value of one of the five controls.
    pub fn control(&self, parameter: ControlParameter) -> f32 {
        match parameter {
            ControlParameter::ManualGain => self.attenuation.settings().manual_gain,
            ControlParameter::ReverbDelay => self.reverb.settings().delay,
            ControlParameter::ReverbGain => self.reverb.settings().gain,
            ControlParameter::ReverbCutoff => self.reverb.settings().cutoff,
            ControlParameter::GeneralCutoff => self.attenuation.settings().general_cutoff,
        }
    }

    /// All five controls read back as a bundle.
    pub fn controls(&self) -> ParameterBundle {
        let mut bundle = ParameterBundle::default();
        for parameter in ControlParameter::ALL {
            bundle.set(parameter, self.control(parameter));
        }
        bundle
    }

    pub(crate) fn set_control(
        &mut self,
        graph: &mut dyn AudioGraph,
        parameter: ControlParameter,
        value: f32,
    ) -> Result<()> {
        match parameter {
            ControlParameter::ManualGain => self.attenuation.set_manual_gain(graph, value),
            ControlParameter::ReverbDelay => self.reverb.set_delay(graph, value),
            ControlParameter::ReverbGain => self.reverb.set_gain(graph, value),
            ControlParameter::ReverbCutoff => self.reverb.set_cutoff(graph, value),
            ControlParameter::GeneralCutoff => self.attenuation.set_general_cutoff(graph, value),
        }
    }

    /// Writes the five controls one after another in [`ControlParameter::ALL`]
    /// order, stopping at the first failure.
    pub(crate) fn write_bundle(
        &mut self,
        graph: &mut dyn AudioGraph,
        bundle: ParameterBundle,
    ) -> Result<()> {
        for parameter in ControlParameter::ALL {
            self.set_control(graph, parameter, bundle.get(parameter))?;
        }
        Ok(())
    }
}

/// Per-source capability handle returned by
/// [`RoomSession::source_controls`](crate::RoomSession::source_controls).
///
/// Exposes only the reverb and attenuation operations of one source. Writes made
/// through it are not mirrored into the session's [`ControlPanel`](crate::ControlPanel),
/// which tracks the uniform controls.
pub struct SourceControls<'a> {
    pub(crate) channel: &'a mut SoundSourceChannel,
    pub(crate) graph: &'a mut dyn AudioGraph,
}

impl SourceControls<'_> {
    pub fn index(&self) -> usize {
        self.channel.index
    }

    pub fn reverb(&self) -> ReverbSettings {
        self.channel.reverb()
    }

    pub fn attenuation(&self) -> AttenuationSettings {
        self.channel.attenuation()
    }

    pub fn set_delay(&mut self, seconds: f32) -> Result<()> {
        self.channel.reverb.set_delay(&mut *self.graph, seconds)
    }

    pub fn set_gain(&mut self, gain: f32) -> Result<()> {
        self.channel.reverb.set_gain(&mut *self.graph, gain)
    }

    pub fn set_cutoff(&mut self, hz: f32) -> Result<()> {
        self.channel.reverb.set_cutoff(&mut *self.graph, hz)
    }

    pub fn set_manual_gain(&mut self, gain: f32) -> Result<()> {
        self.channel.attenuation.set_manual_gain(&mut *self.graph, gain)
    }

    pub fn set_general_cutoff(&mut self, hz: f32) -> Result<()> {
        self.channel.attenuation.set_general_cutoff(&mut *self.graph, hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryGraph, MemoryScene, Rolloff};

    #[test]
    fn test_channel_routes_reverb_into_attenuation_and_scene() {
        let mut graph = MemoryGraph::new();
        let mut scene = MemoryScene::new();
        let options = SourceOptions::with_rolloff(Rolloff::None);

        let channel = SoundSourceChannel::build(0, &mut graph, &mut scene, &options, 3.0).unwrap();

        assert!(graph.is_connected(channel.reverb.output(), channel.attenuation.input()));
        let record = scene.source(channel.scene_source()).unwrap();
        assert_eq!(record.input, channel.attenuation.output());
        assert_eq!(record.options.rolloff, Rolloff::None);
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn test_source_controls_write_one_channel() {
        let mut graph = MemoryGraph::new();
        let mut scene = MemoryScene::new();
        let options = SourceOptions::default();
        let mut channel =
            SoundSourceChannel::build(2, &mut graph, &mut scene, &options, 3.0).unwrap();

        let mut controls = SourceControls {
            channel: &mut channel,
            graph: &mut graph,
        };
        controls.set_delay(0.2).unwrap();
        controls.set_manual_gain(0.5).unwrap();
        assert_eq!(controls.index(), 2);
        assert_eq!(controls.reverb().delay, 0.2);

        assert_eq!(channel.attenuation().manual_gain, 0.5);
        assert_eq!(channel.reverb().gain, 1.0);
    }

    #[test]
    fn test_write_bundle_reads_back() {
        let mut graph = MemoryGraph::new();
        let mut scene = MemoryScene::new();
        let mut channel =
            SoundSourceChannel::build(0, &mut graph, &mut scene, &SourceOptions::default(), 3.0)
                .unwrap();

        channel
            .write_bundle(&mut graph, ParameterBundle::FARAWAY)
            .unwrap();
        assert_eq!(channel.controls(), ParameterBundle::FARAWAY);
        assert_eq!(channel.control(ControlParameter::ReverbGain), 0.7);
        assert_eq!(graph.param_writes(), 5);
    }

    #[test]
    fn test_set_position_updates_scene() {
        let mut graph = MemoryGraph::new();
        let mut scene = MemoryScene::new();
        let mut channel =
            SoundSourceChannel::build(0, &mut graph, &mut scene, &SourceOptions::default(), 3.0)
                .unwrap();

        channel.set_position(&mut scene, Vec3::new(-4.0, 0.0, 0.0)).unwrap();
        assert_eq!(channel.position(), Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(
            scene.source(channel.scene_source()).unwrap().position,
            Vec3::new(-4.0, 0.0, 0.0)
        );
    }
}
