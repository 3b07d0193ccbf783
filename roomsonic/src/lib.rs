//! # RoomSonic
//!
//! A room-acoustics parameter model for spatial audio demos.
//!
//! RoomSonic turns a handful of named choices (room size, wall materials, a
//! "close" or "faraway" listening preset, normalized source and listener
//! positions) into concrete writes against an audio graph and a spatial scene
//! engine. It owns the per-source signal chains and their current values; the
//! graph and the scene engine themselves sit behind the [`AudioGraph`] and
//! [`SceneEngine`] traits.
//!
//! ## Quick Start
//!
//! ```
//! use roomsonic::backend::{MemoryGraph, MemoryScene};
//! use roomsonic::*;
//!
//! // Three sources and a listener in the huge, open-air room
//! let desc = SessionDesc::default();
//! let mut session = RoomSession::new(desc)?;
//!
//! // Build one reverb + attenuation chain per source
//! session.initialize(MemoryGraph::new(), MemoryScene::new())?;
//!
//! // The first source sits at 10% of the width, centered in depth
//! assert_eq!(session.source_positions()[0], Vec3::new(-4.0, 0.0, 0.0));
//!
//! // Swap the room; positions are rescaled to the new bounds
//! session.select_room("medium", "brick")?;
//!
//! // Push a louder reverb tail to every source
//! session.apply_preset("faraway")?;
//! session.set_general_cutoff(1200.0)?;
//! println!("{}", session.controls().stats());
//!
//! for event in session.poll_events() {
//!     if let RoomSonicEvent::RoomChanged { dimension, material } = event {
//!         println!("now in a {} {} room", dimension, material);
//!     }
//! }
//! # Ok::<(), RoomSonicError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`RoomSession`]**: Context object owning the room, layout, controls and source channels
//! - **[`SessionDesc`]**: Builder-style configuration of a session
//! - **[`MaterialTable`]**: Nine-band absorption coefficients by material name
//! - **[`RoomPreset`]**: Named room geometries and material bundles
//! - **[`PositionMapper`]**: Normalized 2D layout to room-space 3D positions
//! - **[`ReverbChain`]** / **[`AttenuationControl`]**: The per-source signal chain
//! - **[`PresetApplier`]**: Validated, all-or-nothing application of a [`ParameterBundle`]
//! - **[`RoomSonicEvent`]**: Events queued by the session (room, position and parameter changes)

pub mod backend;
pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod math;
pub mod preset;
pub mod scene;
pub mod session;
pub mod spatial;
mod validation;

pub use backend::{AudioGraph, MemoryGraph, MemoryScene, NodeId, Rolloff, SceneEngine, SourceOptions};
pub use config::{CoordinatePolicy, ParameterPolicy, SessionDesc};
pub use controls::{ControlPanel, ControlParameter};
pub use error::{Result, RoomSonicError};
pub use events::RoomSonicEvent;
pub use math::{Vec2, Vec3};
pub use preset::{BundleName, ParameterBundle, PresetApplier, StagedBundle};
pub use scene::{
    MaterialCoefficients, MaterialTable, Room, RoomDimensionPreset, RoomDimensions,
    RoomMaterialPreset, RoomMaterials, RoomPreset, RoomProperties, WallFace,
};
pub use session::{EVENT_QUEUE_CAPACITY, RoomSession};
pub use spatial::{
    AttenuationControl, MappedPositions, PositionMapper, ReverbChain, SoundSourceChannel,
    SourceControls,
};
