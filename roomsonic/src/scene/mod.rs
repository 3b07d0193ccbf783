//! Room description: absorption materials, geometry and named presets.
//!
//! # Overview
//!
//! 1. **MaterialTable** - Maps material names to nine-band absorption coefficients
//! 2. **Room** - Validated dimensions plus one material per [`WallFace`]
//! 3. **RoomPreset** - Named geometries (small..huge) and material bundles
//!    (brick, curtains, marble, outside) that resolve into a `Room`
//!
//! # Example
//!
//! ```
//! use roomsonic::scene::{MaterialTable, RoomPreset, WallFace};
//!
//! let materials = MaterialTable::with_presets();
//! let room = RoomPreset::resolve("large", "curtains", &materials)?;
//!
//! assert_eq!(room.dimensions().depth, 9.0);
//! assert_eq!(room.materials().get(WallFace::Left), "curtain-heavy");
//! # Ok::<(), roomsonic::RoomSonicError>(())
//! ```

pub mod material;
pub mod preset;
pub mod room;

pub use material::{FREQUENCY_BANDS, MaterialCoefficients, MaterialTable, NUM_FREQUENCY_BANDS};
pub use preset::{RoomDimensionPreset, RoomMaterialPreset, RoomPreset};
pub use room::{Room, RoomDimensions, RoomMaterials, RoomProperties, WallFace};
