use crate::config::CoordinatePolicy;
use crate::error::{Result, RoomSonicError};
use crate::math::{Vec2, Vec3};
use crate::scene::RoomDimensions;
use crate::validation::check_coordinate;

/// Maps a normalized coordinate into room space.
///
/// `x = (nx - 0.5) * width / 2`, `z = (ny - 0.5) * depth / 2` and
/// `y = height_override` (0 when `None`). No clamping is applied.
pub fn map_position(normalized: Vec2, room: &RoomDimensions, height_override: Option<f32>) -> Vec3 {
    let x = (normalized.x - 0.5) * room.width / 2.0;
    let y = height_override.unwrap_or(0.0);
    let z = (normalized.y - 0.5) * room.depth / 2.0;
    Vec3::new(x, y, z)
}

/// Room-space positions of every element of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedPositions {
    /// Indexed like the sound source channels
    pub sources: Vec<Vec3>,
    pub listener: Vec3,
}

/// Applies a [`CoordinatePolicy`] before mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionMapper {
    policy: CoordinatePolicy,
}

impl PositionMapper {
    pub fn new(policy: CoordinatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CoordinatePolicy {
        self.policy
    }

    pub fn map_source(
        &self,
        normalized: Vec2,
        room: &RoomDimensions,
        height_override: Option<f32>,
    ) -> Result<Vec3> {
        let normalized = check_coordinate(self.policy, normalized)?;
        Ok(map_position(normalized, room, height_override))
    }

    /// The listener always sits at `y = 0`.
    pub fn map_listener(&self, normalized: Vec2, room: &RoomDimensions) -> Result<Vec3> {
        let normalized = check_coordinate(self.policy, normalized)?;
        Ok(map_position(normalized, room, None))
    }

    /// Maps a whole layout: the last element is the listener, every preceding
    /// element is a source in channel order.
    pub fn map_layout(
        &self,
        layout: &[Vec2],
        room: &RoomDimensions,
        height_override: Option<f32>,
    ) -> Result<MappedPositions> {
        let Some((listener, sources)) = layout.split_last() else {
            return Err(RoomSonicError::Configuration(
                "Cannot map an empty layout".into(),
            ));
        };

        let sources = sources
            .iter()
            .map(|point| self.map_source(*point, room, height_override))
            .collect::<Result<Vec<_>>>()?;
        let listener = self.map_listener(*listener, room)?;

        Ok(MappedPositions { sources, listener })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RoomDimensionPreset;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_huge_room_example() {
        let huge = RoomDimensionPreset::Huge.dimensions();
        let pos = map_position(Vec2::new(0.1, 0.5), &huge, Some(1.5));
        assert!(approx(pos, Vec3::new(-4.0, 1.5, 0.0)), "got {}", pos);
    }

    #[test]
    fn test_center_maps_to_origin() {
        let large = RoomDimensionPreset::Large.dimensions();
        assert_eq!(map_position(Vec2::splat(0.5), &large, None), Vec3::ZERO);
    }

    #[test]
    fn test_mapping_is_deterministic_and_monotonic() {
        let room = RoomDimensionPreset::Medium.dimensions();
        let a = map_position(Vec2::new(0.2, 0.3), &room, None);
        assert_eq!(a, map_position(Vec2::new(0.2, 0.3), &room, None));

        let mut previous = map_position(Vec2::new(0.0, 0.0), &room, None);
        for step in 1..=10 {
            let t = step as f32 / 10.0;
            let next = map_position(Vec2::new(t, t), &room, None);
            assert!(next.x > previous.x);
            assert!(next.z > previous.z);
            previous = next;
        }
    }

    #[test]
    fn test_layout_splits_listener() {
        let room = RoomDimensionPreset::Huge.dimensions();
        let mapper = PositionMapper::default();
        let layout = [Vec2::new(0.1, 0.5), Vec2::new(0.9, 0.5), Vec2::new(0.5, 0.75)];

        let mapped = mapper.map_layout(&layout, &room, Some(2.0)).unwrap();
        assert_eq!(mapped.sources.len(), 2);
        assert!(approx(mapped.sources[0], Vec3::new(-4.0, 2.0, 0.0)));
        assert!(approx(mapped.sources[1], Vec3::new(4.0, 2.0, 0.0)));
        // listener ignores the height override
        assert!(approx(mapped.listener, Vec3::new(0.0, 0.0, 2.5)));
    }

    #[test]
    fn test_out_of_range_passes_through_by_default() {
        let room = RoomDimensionPreset::Small.dimensions();
        let mapper = PositionMapper::default();
        let pos = mapper.map_source(Vec2::new(1.5, 0.5), &room, None).unwrap();
        assert!(approx(pos, Vec3::new(0.75, 0.0, 0.0)));
    }

    #[test]
    fn test_clamp_policy() {
        let room = RoomDimensionPreset::Huge.dimensions();
        let mapper = PositionMapper::new(CoordinatePolicy::Clamp);
        let pos = mapper.map_listener(Vec2::new(2.0, -1.0), &room).unwrap();
        assert!(approx(pos, Vec3::new(5.0, 0.0, -5.0)));
    }

    #[test]
    fn test_empty_layout_fails() {
        let room = RoomDimensionPreset::Huge.dimensions();
        assert!(PositionMapper::default().map_layout(&[], &room, None).is_err());
    }
}
