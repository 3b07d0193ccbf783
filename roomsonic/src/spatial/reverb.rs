use crate::backend::{AudioGraph, AudioParam, NodeId};
use crate::error::Result;

/// Cutoff (Hz) the reverb low-pass starts at, the -12 dB point used for reflections.
pub const DEFAULT_REFLECTION_CUTOFF_FREQUENCY: f32 = 6400.0;

/// Current values written to a [`ReverbChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Delay time in seconds
    pub delay: f32,
    /// Linear gain of the output stage
    pub gain: f32,
    /// Low-pass cutoff in Hz
    pub cutoff: f32,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            delay: 0.0,
            gain: 1.0,
            cutoff: DEFAULT_REFLECTION_CUTOFF_FREQUENCY,
        }
    }
}

/// Single-tap reflection path wrapping one source:
/// input gain -> low-pass -> delay -> output gain.
///
/// A chain only exists once it has been built inside an [`AudioGraph`], so
/// every setter is a plain write with no "not yet constructed" state.
#[derive(Debug, Clone)]
pub struct ReverbChain {
    input: NodeId,
    lowpass: NodeId,
    delay: NodeId,
    output: NodeId,
    max_delay: f32,
    settings: ReverbSettings,
}

impl ReverbChain {
    /// Creates and connects the four stages.
    ///
    /// The delay stage can never exceed `max_delay` seconds.
    pub fn build(graph: &mut dyn AudioGraph, max_delay: f32) -> Result<Self> {
        let settings = ReverbSettings::default();

        let input = graph.create_gain(1.0)?;
        let lowpass = graph.create_lowpass(settings.cutoff, 0.0)?;
        let delay = graph.create_delay(max_delay)?;
        let output = graph.create_gain(settings.gain)?;

        graph.connect(input, lowpass)?;
        graph.connect(lowpass, delay)?;
        graph.connect(delay, output)?;

        log::debug!(
            "Built reverb chain {} -> {} -> {} -> {} (max delay {}s)",
            input,
            lowpass,
            delay,
            output,
            max_delay
        );

        Ok(Self {
            input,
            lowpass,
            delay,
            output,
            max_delay,
            settings,
        })
    }

    /// Entry stage; the source signal connects here.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Exit stage, feeding whatever follows the chain.
    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn max_delay(&self) -> f32 {
        self.max_delay
    }

    pub fn settings(&self) -> ReverbSettings {
        self.settings
    }

    pub fn set_delay(&mut self, graph: &mut dyn AudioGraph, seconds: f32) -> Result<()> {
        graph.set_param(self.delay, AudioParam::DelayTime, seconds)?;
        self.settings.delay = seconds;
        Ok(())
    }

    pub fn set_gain(&mut self, graph: &mut dyn AudioGraph, gain: f32) -> Result<()> {
        graph.set_param(self.output, AudioParam::Gain, gain)?;
        self.settings.gain = gain;
        Ok(())
    }

    pub fn set_cutoff(&mut self, graph: &mut dyn AudioGraph, hz: f32) -> Result<()> {
        graph.set_param(self.lowpass, AudioParam::Frequency, hz)?;
        self.settings.cutoff = hz;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryGraph;

    #[test]
    fn test_build_wires_four_stages_in_order() {
        let mut graph = MemoryGraph::new();
        let chain = ReverbChain::build(&mut graph, 3.0).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.connections().len(), 3);
        assert!(graph.is_connected(chain.input, chain.lowpass));
        assert!(graph.is_connected(chain.lowpass, chain.delay));
        assert!(graph.is_connected(chain.delay, chain.output));

        assert_eq!(graph.param(chain.lowpass, AudioParam::Q), Some(0.0));
        assert_eq!(
            graph.param(chain.lowpass, AudioParam::Frequency),
            Some(DEFAULT_REFLECTION_CUTOFF_FREQUENCY)
        );
        assert_eq!(graph.node(chain.delay).unwrap().max_delay, Some(3.0));
        assert_eq!(chain.settings(), ReverbSettings::default());
    }

    #[test]
    fn test_setters_write_through() {
        let mut graph = MemoryGraph::new();
        let mut chain = ReverbChain::build(&mut graph, 3.0).unwrap();

        chain.set_delay(&mut graph, 0.09).unwrap();
        chain.set_gain(&mut graph, 0.7).unwrap();
        chain.set_cutoff(&mut graph, 400.0).unwrap();

        assert_eq!(graph.param(chain.delay, AudioParam::DelayTime), Some(0.09));
        assert_eq!(graph.param(chain.output, AudioParam::Gain), Some(0.7));
        assert_eq!(graph.param(chain.lowpass, AudioParam::Frequency), Some(400.0));
        assert_eq!(
            chain.settings(),
            ReverbSettings {
                delay: 0.09,
                gain: 0.7,
                cutoff: 400.0
            }
        );
    }

    #[test]
    fn test_values_are_not_clamped() {
        let mut graph = MemoryGraph::new();
        let mut chain = ReverbChain::build(&mut graph, 3.0).unwrap();

        chain.set_gain(&mut graph, -2.0).unwrap();
        chain.set_cutoff(&mut graph, -100.0).unwrap();

        assert_eq!(graph.param(chain.output, AudioParam::Gain), Some(-2.0));
        assert_eq!(chain.settings().cutoff, -100.0);
    }
}
