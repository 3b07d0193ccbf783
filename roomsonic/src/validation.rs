//! Range checks shared by the session, the position mapper and the preset applier.

use crate::config::{CoordinatePolicy, ParameterPolicy};
use crate::controls::ControlParameter;
use crate::error::{Result, RoomSonicError};
use crate::math::Vec2;

/// Checks a control value against `policy`.
///
/// `max_delay` bounds [`ControlParameter::ReverbDelay`] under the strict policy.
pub(crate) fn check_parameter(
    policy: ParameterPolicy,
    parameter: ControlParameter,
    value: f32,
    max_delay: f32,
) -> Result<()> {
    if policy == ParameterPolicy::Permissive {
        return Ok(());
    }

    if !value.is_finite() {
        return Err(RoomSonicError::Range(format!(
            "{} must be finite, got {}",
            parameter, value
        )));
    }

    let valid = match parameter {
        ControlParameter::ManualGain | ControlParameter::ReverbGain => value >= 0.0,
        ControlParameter::ReverbCutoff | ControlParameter::GeneralCutoff => value > 0.0,
        ControlParameter::ReverbDelay => (0.0..=max_delay).contains(&value),
    };

    if valid {
        Ok(())
    } else {
        Err(RoomSonicError::Range(format!(
            "{} out of range: {}",
            parameter, value
        )))
    }
}

/// Applies `policy` to a normalized coordinate.
pub(crate) fn check_coordinate(policy: CoordinatePolicy, point: Vec2) -> Result<Vec2> {
    if !point.is_finite() {
        return Err(RoomSonicError::Range(format!(
            "Normalized coordinate must be finite, got {}",
            point
        )));
    }

    let inside = (0.0..=1.0).contains(&point.x) && (0.0..=1.0).contains(&point.y);
    match policy {
        CoordinatePolicy::PassThrough => Ok(point),
        _ if inside => Ok(point),
        CoordinatePolicy::Clamp => {
            let clamped = point.clamp(Vec2::ZERO, Vec2::ONE);
            log::warn!("Clamped normalized coordinate {} to {}", point, clamped);
            Ok(clamped)
        }
        CoordinatePolicy::Reject => Err(RoomSonicError::Range(format!(
            "Normalized coordinate {} is outside [0, 1]",
            point
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_passes_anything() {
        for param in ControlParameter::ALL {
            assert!(check_parameter(ParameterPolicy::Permissive, param, -5.0, 3.0).is_ok());
            assert!(check_parameter(ParameterPolicy::Permissive, param, f32::NAN, 3.0).is_ok());
        }
    }

    #[test]
    fn test_strict_bounds() {
        let strict = ParameterPolicy::Strict;
        assert!(check_parameter(strict, ControlParameter::ManualGain, 0.0, 3.0).is_ok());
        assert!(check_parameter(strict, ControlParameter::ManualGain, 2.5, 3.0).is_ok());
        assert!(check_parameter(strict, ControlParameter::ReverbGain, -0.1, 3.0).is_err());
        assert!(check_parameter(strict, ControlParameter::ReverbCutoff, 0.0, 3.0).is_err());
        assert!(check_parameter(strict, ControlParameter::GeneralCutoff, 2000.0, 3.0).is_ok());
        assert!(check_parameter(strict, ControlParameter::ReverbDelay, 3.0, 3.0).is_ok());
        assert!(check_parameter(strict, ControlParameter::ReverbDelay, 3.5, 3.0).is_err());
        assert!(matches!(
            check_parameter(strict, ControlParameter::ReverbDelay, f32::INFINITY, 3.0),
            Err(RoomSonicError::Range(_))
        ));
    }

    #[test]
    fn test_coordinate_policies() {
        let outside = Vec2::new(1.2, -0.5);

        assert_eq!(
            check_coordinate(CoordinatePolicy::PassThrough, outside).unwrap(),
            outside
        );
        assert_eq!(
            check_coordinate(CoordinatePolicy::Clamp, outside).unwrap(),
            Vec2::new(1.0, 0.0)
        );
        assert!(check_coordinate(CoordinatePolicy::Reject, outside).is_err());

        let inside = Vec2::new(0.3, 0.7);
        assert_eq!(check_coordinate(CoordinatePolicy::Reject, inside).unwrap(), inside);
    }

    #[test]
    fn test_non_finite_coordinates_always_rejected() {
        let nan = Vec2::new(f32::NAN, 0.5);
        assert!(check_coordinate(CoordinatePolicy::PassThrough, nan).is_err());
        assert!(check_coordinate(CoordinatePolicy::Clamp, nan).is_err());
    }
}
