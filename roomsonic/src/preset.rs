//! Named parameter bundles and their application to every source.
//!
//! A bundle is always applied as a complete set of five values. Application is
//! split into two phases:
//!
//! 1. **Stage**: every value is checked against the session's
//!    [`ParameterPolicy`]. Nothing is written if any check fails.
//! 2. **Commit**: each source receives manual gain, reverb delay, reverb gain,
//!    reverb cutoff and general cutoff, in that order. If the audio graph
//!    rejects a write, every source touched so far is restored to the settings
//!    it had before the commit and the error is returned.
//!
//! The audio graph still observes the individual writes while a commit runs.

use crate::backend::AudioGraph;
use crate::config::ParameterPolicy;
use crate::controls::ControlParameter;
use crate::error::{Result, RoomSonicError};
use crate::spatial::SoundSourceChannel;
use crate::validation::check_parameter;
use std::fmt;
use std::str::FromStr;

/// The five uniform controls as one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBundle {
    pub manual_gain: f32,
    /// Seconds
    pub reverb_delay: f32,
    pub reverb_gain: f32,
    /// Hz
    pub reverb_cutoff: f32,
    /// Hz
    pub general_cutoff: f32,
}

impl ParameterBundle {
    /// Near source: quiet reverb tail.
    pub const CLOSE: Self = Self {
        manual_gain: 0.25,
        reverb_delay: 0.09,
        reverb_gain: 0.20,
        reverb_cutoff: 400.0,
        general_cutoff: 2000.0,
    };

    /// Distant source: lower direct gain, louder reverb tail.
    pub const FARAWAY: Self = Self {
        manual_gain: 0.15,
        reverb_delay: 0.09,
        reverb_gain: 0.70,
        reverb_cutoff: 400.0,
        general_cutoff: 2000.0,
    };

    /// Looks up a built-in bundle by name.
    pub fn named(name: &str) -> Result<Self> {
        Ok(name.parse::<BundleName>()?.bundle())
    }

    pub fn get(&self, parameter: ControlParameter) -> f32 {
        match parameter {
            ControlParameter::ManualGain => self.manual_gain,
            ControlParameter::ReverbDelay => self.reverb_delay,
            ControlParameter::ReverbGain => self.reverb_gain,
            ControlParameter::ReverbCutoff => self.reverb_cutoff,
            ControlParameter::GeneralCutoff => self.general_cutoff,
        }
    }

    pub fn set(&mut self, parameter: ControlParameter, value: f32) {
        let slot = match parameter {
            ControlParameter::ManualGain => &mut self.manual_gain,
            ControlParameter::ReverbDelay => &mut self.reverb_delay,
            ControlParameter::ReverbGain => &mut self.reverb_gain,
            ControlParameter::ReverbCutoff => &mut self.reverb_cutoff,
            ControlParameter::GeneralCutoff => &mut self.general_cutoff,
        };
        *slot = value;
    }
}

impl Default for ParameterBundle {
    fn default() -> Self {
        Self::CLOSE
    }
}

/// Names of the built-in bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleName {
    Close,
    Faraway,
}

impl BundleName {
    pub const ALL: [BundleName; 2] = [Self::Close, Self::Faraway];

    pub fn name(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Faraway => "faraway",
        }
    }

    pub fn bundle(self) -> ParameterBundle {
        match self {
            Self::Close => ParameterBundle::CLOSE,
            Self::Faraway => ParameterBundle::FARAWAY,
        }
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BundleName {
    type Err = RoomSonicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bundle| bundle.name() == s)
            .ok_or_else(|| RoomSonicError::Configuration(format!("Unknown preset '{}'", s)))
    }
}

/// A bundle whose values passed validation and may be committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedBundle(ParameterBundle);

impl StagedBundle {
    pub fn bundle(&self) -> ParameterBundle {
        self.0
    }
}

/// Applies a bundle to every source channel.
#[derive(Debug, Clone, Copy)]
pub struct PresetApplier {
    policy: ParameterPolicy,
    max_delay: f32,
}

impl PresetApplier {
    pub fn new(policy: ParameterPolicy, max_delay: f32) -> Self {
        Self { policy, max_delay }
    }

    /// Validates all five values without writing anything.
    pub fn stage(&self, bundle: ParameterBundle) -> Result<StagedBundle> {
        for parameter in ControlParameter::ALL {
            check_parameter(self.policy, parameter, bundle.get(parameter), self.max_delay)?;
        }
        Ok(StagedBundle(bundle))
    }

    /// Writes a staged bundle into every channel, restoring all touched channels
    /// if the graph rejects a write.
    pub fn commit(
        &self,
        staged: StagedBundle,
        channels: &mut [SoundSourceChannel],
        graph: &mut dyn AudioGraph,
    ) -> Result<()> {
        let previous: Vec<ParameterBundle> =
            channels.iter().map(SoundSourceChannel::controls).collect();

        for position in 0..channels.len() {
            if let Err(err) = channels[position].write_bundle(graph, staged.0) {
                log::warn!(
                    "Preset commit failed on source {}: {}; restoring {} source(s)",
                    channels[position].index(),
                    err,
                    position + 1
                );
                rollback(&mut channels[..=position], &previous, graph);
                return Err(err);
            }
        }

        Ok(())
    }

    pub fn apply(
        &self,
        bundle: ParameterBundle,
        channels: &mut [SoundSourceChannel],
        graph: &mut dyn AudioGraph,
    ) -> Result<()> {
        let staged = self.stage(bundle)?;
        self.commit(staged, channels, graph)
    }
}

fn rollback(
    channels: &mut [SoundSourceChannel],
    previous: &[ParameterBundle],
    graph: &mut dyn AudioGraph,
) {
    for (channel, bundle) in channels.iter_mut().zip(previous) {
        if let Err(err) = channel.write_bundle(graph, *bundle) {
            log::warn!("Could not restore source {}: {}", channel.index(), err);
        }
    }
}
