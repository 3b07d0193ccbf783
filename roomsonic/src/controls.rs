//! User-facing control parameters and their mirrored display values.

use crate::error::{Result, RoomSonicError};
use crate::preset::ParameterBundle;
use std::fmt;
use std::str::FromStr;

/// One of the five uniform per-source controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlParameter {
    /// Linear gain overriding the unity source gain
    ManualGain,
    /// Reverb delay time in seconds
    ReverbDelay,
    /// Linear gain of the reverb output stage
    ReverbGain,
    /// Cutoff (Hz) of the low-pass inside the reverb chain
    ReverbCutoff,
    /// Cutoff (Hz) of the low-pass applied after the reverb chain
    GeneralCutoff,
}

impl ControlParameter {
    /// In the order a preset bundle writes them.
    pub const ALL: [ControlParameter; 5] = [
        Self::ManualGain,
        Self::ReverbDelay,
        Self::ReverbGain,
        Self::ReverbCutoff,
        Self::GeneralCutoff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ManualGain => "manual-gain",
            Self::ReverbDelay => "reverb-delay",
            Self::ReverbGain => "reverb-gain",
            Self::ReverbCutoff => "reverb-cutoff",
            Self::GeneralCutoff => "general-cutoff",
        }
    }

    /// Label used in the stats line.
    pub fn label(self) -> &'static str {
        match self {
            Self::ManualGain => "Gain",
            Self::ReverbDelay => "Reverb Delay",
            Self::ReverbGain => "Reverb Gain",
            Self::ReverbCutoff => "Reverb Freq",
            Self::GeneralCutoff => "General Freq",
        }
    }
}

impl fmt::Display for ControlParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlParameter {
    type Err = RoomSonicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|param| param.name() == s)
            .ok_or_else(|| RoomSonicError::Configuration(format!("Unknown control '{}'", s)))
    }
}

/// Display mirror of the five controls, updated after every successful write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPanel {
    values: ParameterBundle,
}

impl ControlPanel {
    pub fn new(initial: ParameterBundle) -> Self {
        Self { values: initial }
    }

    pub fn get(&self, parameter: ControlParameter) -> f32 {
        self.values.get(parameter)
    }

    /// Current values as a bundle.
    pub fn snapshot(&self) -> ParameterBundle {
        self.values
    }

    pub(crate) fn set(&mut self, parameter: ControlParameter, value: f32) {
        self.values.set(parameter, value);
    }

    pub(crate) fn set_all(&mut self, values: ParameterBundle) {
        self.values = values;
    }

    /// Renders `Gain: .. Reverb Delay: .. Reverb Gain: .. Reverb Freq: .. General Freq: ..`.
    pub fn stats(&self) -> String {
        ControlParameter::ALL
            .iter()
            .map(|param| format!("{}: {}", param.label(), self.get(*param)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(ParameterBundle::CLOSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names_round_trip() {
        for param in ControlParameter::ALL {
            assert_eq!(param.name().parse::<ControlParameter>().unwrap(), param);
        }
        assert!("volume".parse::<ControlParameter>().is_err());
    }

    #[test]
    fn test_panel_defaults_to_close() {
        let panel = ControlPanel::default();
        assert_eq!(panel.get(ControlParameter::ManualGain), 0.25);
        assert_eq!(panel.get(ControlParameter::GeneralCutoff), 2000.0);
    }

    #[test]
    fn test_stats_line() {
        let panel = ControlPanel::new(ParameterBundle::FARAWAY);
        assert_eq!(
            panel.stats(),
            "Gain: 0.15 Reverb Delay: 0.09 Reverb Gain: 0.7 Reverb Freq: 400 General Freq: 2000"
        );
    }

    #[test]
    fn test_set_mirrors_value() {
        let mut panel = ControlPanel::default();
        panel.set(ControlParameter::ReverbCutoff, 1234.5);
        assert_eq!(panel.get(ControlParameter::ReverbCutoff), 1234.5);
        assert_eq!(panel.snapshot().reverb_cutoff, 1234.5);
    }
}
