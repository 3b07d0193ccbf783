//! Shoebox room geometry and per-face material assignment.

use crate::error::{Result, RoomSonicError};
use crate::scene::material::{MaterialCoefficients, MaterialTable};
use std::fmt;
use std::str::FromStr;

/// Rooms smaller than this volume (m³) have no room model.
pub const ROOM_MIN_VOLUME: f32 = 1e-4;

/// One of the six faces of a shoebox room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WallFace {
    Left,
    Right,
    Front,
    Back,
    Down,
    Up,
}

impl WallFace {
    pub const ALL: [WallFace; 6] = [
        WallFace::Left,
        WallFace::Right,
        WallFace::Front,
        WallFace::Back,
        WallFace::Down,
        WallFace::Up,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WallFace::Left => "left",
            WallFace::Right => "right",
            WallFace::Front => "front",
            WallFace::Back => "back",
            WallFace::Down => "down",
            WallFace::Up => "up",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WallFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WallFace {
    type Err = RoomSonicError;

    fn from_str(s: &str) -> Result<Self> {
        WallFace::ALL
            .into_iter()
            .find(|face| face.name() == s)
            .ok_or_else(|| RoomSonicError::Configuration(format!("Unknown wall face '{}'", s)))
    }
}

/// Room extents in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl RoomDimensions {
    /// Creates dimensions, rejecting any extent that is not strictly positive.
    pub fn new(width: f32, height: f32, depth: f32) -> Result<Self> {
        let dimensions = Self {
            width,
            height,
            depth,
        };
        dimensions.validate()?;
        Ok(dimensions)
    }

    pub fn validate(&self) -> Result<()> {
        for (axis, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RoomSonicError::Configuration(format!(
                    "Room {} must be strictly positive, got {}",
                    axis, value
                )));
            }
        }
        Ok(())
    }

    pub fn volume(&self) -> f32 {
        self.width * self.height * self.depth
    }
}

/// Material name assigned to each of the six faces.
///
/// Indexed by [`WallFace`]; there is no way to leave a face unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMaterials {
    faces: [String; 6],
}

impl RoomMaterials {
    /// Assigns the same material to every face.
    pub fn uniform(material: &str) -> Self {
        Self {
            faces: std::array::from_fn(|_| material.to_string()),
        }
    }

    /// Assigns materials in `left, right, front, back, down, up` order.
    pub fn new(
        left: &str,
        right: &str,
        front: &str,
        back: &str,
        down: &str,
        up: &str,
    ) -> Self {
        Self {
            faces: [left, right, front, back, down, up].map(str::to_string),
        }
    }

    pub fn get(&self, face: WallFace) -> &str {
        &self.faces[face.index()]
    }

    pub fn set(&mut self, face: WallFace, material: impl Into<String>) {
        self.faces[face.index()] = material.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (WallFace, &str)> {
        WallFace::ALL
            .into_iter()
            .map(|face| (face, self.faces[face.index()].as_str()))
    }
}

/// A validated room: positive dimensions and every face mapped to a
/// material known to the table it was resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    dimensions: RoomDimensions,
    materials: RoomMaterials,
}

impl Room {
    /// Builds a room, checking the dimensions and every face material.
    ///
    /// # Errors
    ///
    /// Returns [`RoomSonicError::Configuration`] for non-positive dimensions
    /// or a face material missing from `table`.
    pub fn new(
        dimensions: RoomDimensions,
        materials: RoomMaterials,
        table: &MaterialTable,
    ) -> Result<Self> {
        dimensions.validate()?;
        for (face, material) in materials.iter() {
            if !table.contains(material) {
                return Err(RoomSonicError::Configuration(format!(
                    "Unknown material '{}' on {} face",
                    material, face
                )));
            }
        }
        Ok(Self {
            dimensions,
            materials,
        })
    }

    pub fn dimensions(&self) -> RoomDimensions {
        self.dimensions
    }

    pub fn materials(&self) -> &RoomMaterials {
        &self.materials
    }

    pub fn has_room_model(&self) -> bool {
        self.dimensions.volume() >= ROOM_MIN_VOLUME
    }

    /// Absorption coefficients of every face, indexed like [`WallFace::ALL`].
    pub fn wall_coefficients(&self, table: &MaterialTable) -> Result<[MaterialCoefficients; 6]> {
        let mut coefficients = [MaterialCoefficients::TRANSPARENT; 6];
        for (face, material) in self.materials.iter() {
            coefficients[face.index()] = table.coefficients(material)?;
        }
        Ok(coefficients)
    }

    /// Broadband reflection coefficient of every face, indexed like [`WallFace::ALL`].
    pub fn reflection_coefficients(&self, table: &MaterialTable) -> Result<[f32; 6]> {
        Ok(self
            .wall_coefficients(table)?
            .map(|coefficients| coefficients.reflection_coefficient()))
    }

    /// Resolves every face against `table` into what a scene engine consumes.
    pub fn properties(&self, table: &MaterialTable) -> Result<RoomProperties> {
        Ok(RoomProperties {
            dimensions: self.dimensions,
            materials: self.materials.clone(),
            walls: self.wall_coefficients(table)?,
        })
    }
}

/// A [`Room`] with its face materials resolved to coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomProperties {
    pub dimensions: RoomDimensions,
    pub materials: RoomMaterials,
    /// Indexed like [`WallFace::ALL`]
    pub walls: [MaterialCoefficients; 6],
}

impl RoomProperties {
    pub fn wall(&self, face: WallFace) -> MaterialCoefficients {
        self.walls[face.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_must_be_positive() {
        assert!(RoomDimensions::new(1.0, 2.0, 3.0).is_ok());
        assert!(RoomDimensions::new(0.0, 2.0, 3.0).is_err());
        assert!(RoomDimensions::new(1.0, -2.0, 3.0).is_err());
        assert!(RoomDimensions::new(1.0, 2.0, f32::NAN).is_err());
    }

    #[test]
    fn test_wall_face_names_round_trip() {
        for face in WallFace::ALL {
            assert_eq!(face.name().parse::<WallFace>().unwrap(), face);
        }
        assert!("ceiling".parse::<WallFace>().is_err());
    }

    #[test]
    fn test_room_rejects_unknown_face_material() {
        let table = MaterialTable::with_presets();
        let dims = RoomDimensions::new(4.0, 3.0, 4.0).unwrap();

        let mut materials = RoomMaterials::uniform("marble");
        assert!(Room::new(dims, materials.clone(), &table).is_ok());

        materials.set(WallFace::Up, "lava");
        match Room::new(dims, materials, &table) {
            Err(RoomSonicError::Configuration(msg)) => {
                assert!(msg.contains("lava"));
                assert!(msg.contains("up"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_wall_coefficients_follow_face_order() {
        let table = MaterialTable::with_presets();
        let dims = RoomDimensions::new(4.0, 3.0, 4.0).unwrap();
        let materials = RoomMaterials::new(
            "brick-bare",
            "brick-bare",
            "marble",
            "marble",
            "grass",
            "transparent",
        );
        let room = Room::new(dims, materials, &table).unwrap();

        let walls = room.wall_coefficients(&table).unwrap();
        assert_eq!(walls[WallFace::Left.index()], MaterialCoefficients::BRICK_BARE);
        assert_eq!(walls[WallFace::Front.index()], MaterialCoefficients::MARBLE);
        assert_eq!(walls[WallFace::Down.index()], MaterialCoefficients::GRASS);

        let reflections = room.reflection_coefficients(&table).unwrap();
        assert_eq!(reflections[WallFace::Up.index()], 0.0);
        assert!(reflections[WallFace::Front.index()] > 0.9);
    }

    #[test]
    fn test_properties_resolve_against_table() {
        let mut table = MaterialTable::with_presets();
        let dims = RoomDimensions::new(4.0, 3.0, 4.0).unwrap();
        let room = Room::new(dims, RoomMaterials::uniform("marble"), &table).unwrap();

        let before = room.properties(&table).unwrap();
        assert_eq!(before.wall(WallFace::Down), MaterialCoefficients::MARBLE);

        let soft = MaterialCoefficients::new([0.9; 9]).unwrap();
        table.insert("marble", soft);
        let after = room.properties(&table).unwrap();
        assert_eq!(after.wall(WallFace::Down), soft);
        assert_eq!(after.dimensions, before.dimensions);
    }

    #[test]
    fn test_room_model_volume_threshold() {
        let table = MaterialTable::with_presets();
        let tiny = RoomDimensions::new(0.01, 0.001, 0.001).unwrap();
        let room = Room::new(tiny, RoomMaterials::uniform("uniform"), &table).unwrap();
        assert!(!room.has_room_model());
    }
}
