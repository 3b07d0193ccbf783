//! Configuration for a RoomSonic session

use crate::backend::Rolloff;
use crate::error::{Result, RoomSonicError};
use crate::math::Vec2;
use crate::preset::ParameterBundle;
use crate::scene::{RoomDimensionPreset, RoomMaterialPreset};

/// Longest delay (seconds) a reverb delay stage can be set to.
pub const DEFAULT_REVERB_MAX_DURATION: f32 = 3.0;

pub const DEFAULT_AMBISONIC_ORDER: u32 = 1;

/// How scalar parameter writes are checked before reaching the audio graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterPolicy {
    /// Every value is passed through untouched
    #[default]
    Permissive,
    /// Non-finite values, negative gains, non-positive cutoffs and delays outside
    /// `[0, reverb_max_duration]` are rejected with a range error
    Strict,
}

/// How normalized coordinates outside `[0, 1]` are treated.
///
/// Non-finite coordinates are rejected under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Mapped linearly as given, so positions may land outside the room
    #[default]
    PassThrough,
    /// Each axis is clamped into `[0, 1]` before mapping
    Clamp,
    /// Out-of-range coordinates are rejected with a range error
    Reject,
}

/// Descriptor for a [`RoomSession`](crate::RoomSession)
#[derive(Debug, Clone)]
pub struct SessionDesc {
    /// Room geometry selected at construction
    pub dimension: RoomDimensionPreset,
    /// Face materials selected at construction
    pub material: RoomMaterialPreset,
    /// Normalized placement of every element. The last entry is the listener,
    /// every preceding entry is a source (so the source count is `len - 1`).
    pub layout: Vec<Vec2>,
    /// Fixed height of the sources; `None` places them at `y = 0`.
    /// The listener always stays at `y = 0`.
    pub height_override: Option<f32>,
    /// Opaque encoding resolution forwarded to the scene engine
    pub ambisonic_order: u32,
    /// Scene-engine distance rolloff for every source
    pub rolloff: Rolloff,
    pub reverb_max_duration: f32,
    /// Values committed to every source right after initialization
    pub initial_bundle: ParameterBundle,
    pub parameter_policy: ParameterPolicy,
    pub coordinate_policy: CoordinatePolicy,
}

impl Default for SessionDesc {
    fn default() -> Self {
        Self {
            dimension: RoomDimensionPreset::Huge,
            material: RoomMaterialPreset::Outside,
            layout: vec![
                Vec2::new(0.1, 0.5),
                Vec2::new(0.9, 0.5),
                Vec2::new(0.25, 0.75),
                Vec2::new(0.5, 0.5),
            ],
            height_override: None,
            ambisonic_order: DEFAULT_AMBISONIC_ORDER,
            rolloff: Rolloff::None,
            reverb_max_duration: DEFAULT_REVERB_MAX_DURATION,
            initial_bundle: ParameterBundle::CLOSE,
            parameter_policy: ParameterPolicy::default(),
            coordinate_policy: CoordinatePolicy::default(),
        }
    }
}

impl SessionDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(mut self, dimension: RoomDimensionPreset) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn material(mut self, material: RoomMaterialPreset) -> Self {
        self.material = material;
        self
    }

    pub fn layout(mut self, layout: Vec<Vec2>) -> Self {
        self.layout = layout;
        self
    }

    pub fn height_override(mut self, height: Option<f32>) -> Self {
        self.height_override = height;
        self
    }

    pub fn ambisonic_order(mut self, order: u32) -> Self {
        self.ambisonic_order = order;
        self
    }

    pub fn rolloff(mut self, rolloff: Rolloff) -> Self {
        self.rolloff = rolloff;
        self
    }

    pub fn reverb_max_duration(mut self, seconds: f32) -> Self {
        self.reverb_max_duration = seconds;
        self
    }

    pub fn initial_bundle(mut self, bundle: ParameterBundle) -> Self {
        self.initial_bundle = bundle;
        self
    }

    pub fn parameter_policy(mut self, policy: ParameterPolicy) -> Self {
        self.parameter_policy = policy;
        self
    }

    pub fn coordinate_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.coordinate_policy = policy;
        self
    }

    /// Number of sound sources described by the layout.
    pub fn source_count(&self) -> usize {
        self.layout.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.layout.len() < 2 {
            return Err(RoomSonicError::Configuration(format!(
                "Layout needs at least one source and a listener, got {} element(s)",
                self.layout.len()
            )));
        }
        if !self.reverb_max_duration.is_finite() || self.reverb_max_duration <= 0.0 {
            return Err(RoomSonicError::Configuration(format!(
                "Reverb max duration must be positive, got {}",
                self.reverb_max_duration
            )));
        }
        if let Some(height) = self.height_override {
            if !height.is_finite() {
                return Err(RoomSonicError::Configuration(format!(
                    "Height override must be finite, got {}",
                    height
                )));
            }
        }
        Ok(())
    }
}
