//! Event types for RoomSonic

use crate::controls::ControlParameter;
use crate::math::Vec3;
use crate::scene::{RoomDimensionPreset, RoomMaterialPreset};

#[derive(Debug, Clone, PartialEq)]
pub enum RoomSonicEvent {
    Initialized {
        source_count: usize,
    },
    ShutDown,
    RoomChanged {
        dimension: RoomDimensionPreset,
        material: RoomMaterialPreset,
    },
    SourcePositionChanged {
        source: usize,
        old_position: Vec3,
        new_position: Vec3,
    },
    ListenerPositionChanged {
        old_position: Vec3,
        new_position: Vec3,
    },
    /// A uniform control was written to every source
    ParameterChanged {
        parameter: ControlParameter,
        value: f32,
    },
    PresetApplied {
        preset: String,
    },
}

impl RoomSonicEvent {
    pub fn source(&self) -> Option<usize> {
        match self {
            Self::SourcePositionChanged { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn is_position_event(&self) -> bool {
        matches!(
            self,
            Self::SourcePositionChanged { .. } | Self::ListenerPositionChanged { .. }
        )
    }

    pub fn is_parameter_event(&self) -> bool {
        matches!(
            self,
            Self::ParameterChanged { .. } | Self::PresetApplied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        let moved = RoomSonicEvent::SourcePositionChanged {
            source: 1,
            old_position: Vec3::ZERO,
            new_position: Vec3::X,
        };
        assert_eq!(moved.source(), Some(1));
        assert!(moved.is_position_event());
        assert!(!moved.is_parameter_event());

        let preset = RoomSonicEvent::PresetApplied {
            preset: "close".into(),
        };
        assert!(preset.is_parameter_event());
        assert_eq!(preset.source(), None);
    }
}
