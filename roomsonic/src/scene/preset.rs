//! Named room geometries and face-material bundles.

use crate::error::{Result, RoomSonicError};
use crate::scene::material::MaterialTable;
use crate::scene::room::{Room, RoomDimensions, RoomMaterials};
use std::fmt;
use std::str::FromStr;

/// Built-in room geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoomDimensionPreset {
    Small,
    Medium,
    Large,
    #[default]
    Huge,
}

impl RoomDimensionPreset {
    pub const ALL: [RoomDimensionPreset; 4] = [Self::Small, Self::Medium, Self::Large, Self::Huge];

    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }

    pub fn dimensions(self) -> RoomDimensions {
        let (width, height, depth) = match self {
            Self::Small => (1.5, 2.4, 1.3),
            Self::Medium => (4.0, 3.2, 3.9),
            Self::Large => (8.0, 3.4, 9.0),
            Self::Huge => (20.0, 10.0, 20.0),
        };
        RoomDimensions {
            width,
            height,
            depth,
        }
    }
}

impl fmt::Display for RoomDimensionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomDimensionPreset {
    type Err = RoomSonicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                RoomSonicError::Configuration(format!("Unknown room dimension preset '{}'", s))
            })
    }
}

/// Built-in six-face material bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoomMaterialPreset {
    Brick,
    Curtains,
    Marble,
    #[default]
    Outside,
}

impl RoomMaterialPreset {
    pub const ALL: [RoomMaterialPreset; 4] =
        [Self::Brick, Self::Curtains, Self::Marble, Self::Outside];

    pub fn name(self) -> &'static str {
        match self {
            Self::Brick => "brick",
            Self::Curtains => "curtains",
            Self::Marble => "marble",
            Self::Outside => "outside",
        }
    }

    pub fn materials(self) -> RoomMaterials {
        match self {
            // left, right, front, back, down, up
            Self::Brick => RoomMaterials::new(
                "brick-bare",
                "brick-bare",
                "brick-bare",
                "brick-bare",
                "wood-panel",
                "brick-bare",
            ),
            Self::Curtains => RoomMaterials::new(
                "curtain-heavy",
                "curtain-heavy",
                "curtain-heavy",
                "curtain-heavy",
                "wood-panel",
                "wood-panel",
            ),
            Self::Marble => RoomMaterials::uniform("marble"),
            Self::Outside => RoomMaterials::new(
                "transparent",
                "transparent",
                "transparent",
                "transparent",
                "grass",
                "transparent",
            ),
        }
    }
}

impl fmt::Display for RoomMaterialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomMaterialPreset {
    type Err = RoomSonicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                RoomSonicError::Configuration(format!("Unknown room material preset '{}'", s))
            })
    }
}

/// A dimension preset paired with a material preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomPreset {
    pub dimension: RoomDimensionPreset,
    pub material: RoomMaterialPreset,
}

impl RoomPreset {
    pub fn new(dimension: RoomDimensionPreset, material: RoomMaterialPreset) -> Self {
        Self {
            dimension,
            material,
        }
    }

    /// Parses both keys and builds the room they name.
    ///
    /// # Errors
    ///
    /// Returns [`RoomSonicError::Configuration`] if either key is unknown or if
    /// the bundle references a material missing from `table`.
    pub fn resolve(dimension_key: &str, material_key: &str, table: &MaterialTable) -> Result<Room> {
        let preset = Self::parse(dimension_key, material_key)?;
        preset.room(table)
    }

    pub fn parse(dimension_key: &str, material_key: &str) -> Result<Self> {
        Ok(Self {
            dimension: dimension_key.parse()?,
            material: material_key.parse()?,
        })
    }

    pub fn room(&self, table: &MaterialTable) -> Result<Room> {
        Room::new(
            self.dimension.dimensions(),
            self.material.materials(),
            table,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::room::WallFace;

    #[test]
    fn test_resolve_huge_outside() {
        let table = MaterialTable::with_presets();
        let room = RoomPreset::resolve("huge", "outside", &table).unwrap();

        let dims = room.dimensions();
        assert_eq!((dims.width, dims.height, dims.depth), (20.0, 10.0, 20.0));
        assert_eq!(room.materials().get(WallFace::Down), "grass");
        assert_eq!(room.materials().get(WallFace::Left), "transparent");
    }

    #[test]
    fn test_defaults_are_huge_outside() {
        let preset = RoomPreset::default();
        assert_eq!(preset.dimension, RoomDimensionPreset::Huge);
        assert_eq!(preset.material, RoomMaterialPreset::Outside);
    }

    #[test]
    fn test_every_combination_resolves() {
        let table = MaterialTable::with_presets();
        for dimension in RoomDimensionPreset::ALL {
            for material in RoomMaterialPreset::ALL {
                let room = RoomPreset::resolve(dimension.name(), material.name(), &table)
                    .unwrap_or_else(|e| panic!("{} / {}: {}", dimension, material, e));
                assert!(room.has_room_model());
            }
        }
    }

    #[test]
    fn test_unknown_keys_fail() {
        let table = MaterialTable::with_presets();
        assert!(matches!(
            RoomPreset::resolve("gigantic", "brick", &table),
            Err(RoomSonicError::Configuration(_))
        ));
        assert!(matches!(
            RoomPreset::resolve("small", "lava", &table),
            Err(RoomSonicError::Configuration(_))
        ));
    }

    #[test]
    fn test_bundle_requires_materials_in_table() {
        let empty = MaterialTable::new();
        assert!(RoomPreset::resolve("small", "marble", &empty).is_err());
    }

    #[test]
    fn test_brick_floor_is_wood() {
        let materials = RoomMaterialPreset::Brick.materials();
        assert_eq!(materials.get(WallFace::Down), "wood-panel");
        assert_eq!(materials.get(WallFace::Up), "brick-bare");
    }
}
