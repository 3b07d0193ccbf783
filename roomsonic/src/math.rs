//! Math types for RoomSonic
//!
//! Normalized UI-space coordinates are [`Vec2`] in `[0, 1] x [0, 1]`; room-space
//! positions are [`Vec3`] in meters, centered on the room origin, with `y` up.

pub use glam::{Vec2, Vec3};
