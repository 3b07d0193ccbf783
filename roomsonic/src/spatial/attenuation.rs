use crate::backend::{AudioGraph, AudioParam, NodeId};
use crate::error::Result;

/// Unity gain every source starts with.
pub const DEFAULT_SOURCE_GAIN: f32 = 1.0;

/// Cutoff (Hz) the general low-pass starts at, above the audible band.
pub const DEFAULT_GENERAL_CUTOFF: f32 = 22050.0;

/// Resonance of the general low-pass.
const GENERAL_LOWPASS_Q: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttenuationSettings {
    /// Linear gain replacing the unity source gain
    pub manual_gain: f32,
    /// Cutoff in Hz of the low-pass after the reverb chain
    pub general_cutoff: f32,
}

impl Default for AttenuationSettings {
    fn default() -> Self {
        Self {
            manual_gain: DEFAULT_SOURCE_GAIN,
            general_cutoff: DEFAULT_GENERAL_CUTOFF,
        }
    }
}

/// Manual distance attenuation: a gain stage followed by a low-pass,
/// placed after a source's reverb chain.
#[derive(Debug, Clone)]
pub struct AttenuationControl {
    gain: NodeId,
    lowpass: NodeId,
    settings: AttenuationSettings,
}

impl AttenuationControl {
    pub fn build(graph: &mut dyn AudioGraph) -> Result<Self> {
        let settings = AttenuationSettings::default();
        let gain = graph.create_gain(settings.manual_gain)?;
        let lowpass = graph.create_lowpass(settings.general_cutoff, GENERAL_LOWPASS_Q)?;
        graph.connect(gain, lowpass)?;

        Ok(Self {
            gain,
            lowpass,
            settings,
        })
    }

    pub fn input(&self) -> NodeId {
        self.gain
    }

    pub fn output(&self) -> NodeId {
        self.lowpass
    }

    pub fn settings(&self) -> AttenuationSettings {
        self.settings
    }

    pub fn set_manual_gain(&mut self, graph: &mut dyn AudioGraph, gain: f32) -> Result<()> {
        graph.set_param(self.gain, AudioParam::Gain, gain)?;
        self.settings.manual_gain = gain;
        Ok(())
    }

    pub fn set_general_cutoff(&mut self, graph: &mut dyn AudioGraph, hz: f32) -> Result<()> {
        graph.set_param(self.lowpass, AudioParam::Frequency, hz)?;
        self.settings.general_cutoff = hz;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryGraph;

    #[test]
    fn test_build_starts_at_unity() {
        let mut graph = MemoryGraph::new();
        let control = AttenuationControl::build(&mut graph).unwrap();

        assert!(graph.is_connected(control.input(), control.output()));
        assert_eq!(graph.param(control.input(), AudioParam::Gain), Some(1.0));
        assert_eq!(control.settings(), AttenuationSettings::default());
    }

    #[test]
    fn test_manual_gain_and_cutoff() {
        let mut graph = MemoryGraph::new();
        let mut control = AttenuationControl::build(&mut graph).unwrap();

        control.set_manual_gain(&mut graph, 0.15).unwrap();
        control.set_general_cutoff(&mut graph, 2000.0).unwrap();

        assert_eq!(graph.param(control.input(), AudioParam::Gain), Some(0.15));
        assert_eq!(
            graph.param(control.output(), AudioParam::Frequency),
            Some(2000.0)
        );
        assert_eq!(control.settings().manual_gain, 0.15);
        assert_eq!(control.settings().general_cutoff, 2000.0);
    }
}
