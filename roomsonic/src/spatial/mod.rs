// Per-source spatial state
//
// Position mapping from normalized UI space into the active room, plus the
// signal chain every source owns: a reverb chain followed by manual attenuation.

mod attenuation;
mod channel;
mod position;
mod reverb;

// Public API
pub use attenuation::{
    AttenuationControl, AttenuationSettings, DEFAULT_GENERAL_CUTOFF, DEFAULT_SOURCE_GAIN,
};
pub use channel::{SoundSourceChannel, SourceControls};
pub use position::{MappedPositions, PositionMapper, map_position};
pub use reverb::{DEFAULT_REFLECTION_CUTOFF_FREQUENCY, ReverbChain, ReverbSettings};
