use std::f64::consts::{PI, TAU};

use super::{up, Point3, Vector3};

/// Direction of rotation along a curve.
///
/// The discriminant is the sign used in bearing arithmetic:
/// `bearing_out = bearing_in + sign * delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Counter-clockwise (left-hand) curve.
    Ccw = -1,
    /// Clockwise (right-hand) curve.
    Cw = 1,
}

impl Rotation {
    /// Returns the rotation as `-1.0` (ccw) or `1.0` (cw).
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Ccw => -1.0,
            Self::Cw => 1.0,
        }
    }

    /// Maps a numeric direction to a rotation. Zero and non-finite values
    /// mean "unknown".
    #[must_use]
    pub fn from_sign(value: f64) -> Option<Self> {
        if value < 0.0 {
            Some(Self::Ccw)
        } else if value > 0.0 {
            Some(Self::Cw)
        } else {
            None
        }
    }
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_bearing(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Smallest absolute angle between two bearings, in `[0, π]`.
#[must_use]
pub fn bearing_difference(lhs: f64, rhs: f64) -> f64 {
    let d = (lhs - rhs).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Returns `true` iff both bearings are present and within tolerance of each
/// other across the `0 / 2π` seam.
#[must_use]
pub fn bearings_within_tolerance(lhs: Option<f64>, rhs: Option<f64>) -> bool {
    match (lhs, rhs) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() => {
            bearing_difference(a, b) < super::TOLERANCE
        }
        _ => false,
    }
}

/// Unit vector pointing along a bearing.
///
/// Bearings are measured clockwise from true north (`+y`), in radians, so
/// bearing `b` maps to `(sin b, cos b, 0)`.
#[must_use]
pub fn vector_from_bearing(bearing: f64) -> Vector3 {
    Vector3::new(bearing.sin(), bearing.cos(), 0.0)
}

/// Bearing of a vector, ignoring `z`. Returns `None` for a zero-length
/// horizontal component.
#[must_use]
pub fn bearing_of(vector: &Vector3) -> Option<f64> {
    if vector.x.hypot(vector.y) < f64::EPSILON {
        return None;
    }
    Some(normalize_bearing(vector.x.atan2(vector.y)))
}

/// Sign of the turn from `in_vector` to `out_vector`.
///
/// A positive `z` cross product is a counter-clockwise turn. Returns `None`
/// for parallel or zero vectors.
#[must_use]
pub fn rotation_between(in_vector: &Vector3, out_vector: &Vector3) -> Option<Rotation> {
    let cross = in_vector.x * out_vector.y - in_vector.y * out_vector.x;
    if cross.abs() < f64::EPSILON {
        return None;
    }
    if cross > 0.0 {
        Some(Rotation::Ccw)
    } else {
        Some(Rotation::Cw)
    }
}

/// Side of north a vector lies on: `+1` east, `-1` west or due north/south.
///
/// Signs the `acos` of the angle against [`up`] into a full-circle bearing.
#[must_use]
pub fn side_of_north(vector: &Vector3) -> f64 {
    let up = up();
    let cross = up.x * vector.y - up.y * vector.x;
    if cross < 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Offset vector for a distance travelled along a bearing.
#[must_use]
pub fn distance_bearing_to_coordinates(distance: f64, bearing: f64) -> Vector3 {
    vector_from_bearing(normalize_bearing(bearing)) * distance
}

/// Distance and bearing from `from` to `to`.
#[must_use]
pub fn coordinates_to_distance_bearing(from: &Point3, to: &Point3) -> (f64, f64) {
    let delta = to - from;
    let distance = delta.x.hypot(delta.y);
    let bearing = normalize_bearing(delta.x.atan2(delta.y));
    (distance, bearing)
}

/// Derives rotation and central angle from a pair of tangent bearings,
/// assuming the curve turns through less than `π`.
#[must_use]
pub fn delta_from_bearings(bearing_in: f64, bearing_out: f64) -> (Rotation, f64) {
    let turn = (bearing_out - bearing_in).rem_euclid(TAU);
    if turn <= PI {
        (Rotation::Cw, turn)
    } else {
        (Rotation::Ccw, TAU - turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn bearing_of_cardinal_directions() {
        assert_abs_diff_eq!(bearing_of(&Vector3::new(0.0, 1.0, 0.0)).unwrap_or(-1.0), 0.0);
        assert_abs_diff_eq!(
            bearing_of(&Vector3::new(1.0, 0.0, 0.0)).unwrap_or(-1.0),
            FRAC_PI_2
        );
        assert_abs_diff_eq!(bearing_of(&Vector3::new(0.0, -1.0, 0.0)).unwrap_or(-1.0), PI);
        assert_abs_diff_eq!(
            bearing_of(&Vector3::new(-1.0, 0.0, 0.0)).unwrap_or(-1.0),
            3.0 * FRAC_PI_2
        );
        assert!(bearing_of(&Vector3::zeros()).is_none());
    }

    #[test]
    fn vector_from_bearing_inverts_bearing_of() {
        let b = 2.4329645426705673;
        let v = vector_from_bearing(b);
        assert_abs_diff_eq!(bearing_of(&v).unwrap_or(0.0), b, epsilon = 1e-12);
    }

    #[test]
    fn north_to_east_is_clockwise() {
        let north = Vector3::new(0.0, 1.0, 0.0);
        let east = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(rotation_between(&north, &east), Some(Rotation::Cw));
        assert_eq!(rotation_between(&east, &north), Some(Rotation::Ccw));
        assert_eq!(rotation_between(&north, &north), None);
    }

    #[test]
    fn difference_wraps_across_north() {
        assert_abs_diff_eq!(bearing_difference(0.01, TAU - 0.01), 0.02, epsilon = 1e-12);
        assert!(bearings_within_tolerance(Some(0.0), Some(TAU - 1e-6)));
        assert!(!bearings_within_tolerance(Some(0.0), None));
    }

    #[test]
    fn normalize_stays_in_range() {
        assert_abs_diff_eq!(normalize_bearing(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_abs_diff_eq!(normalize_bearing(TAU + 1.0), 1.0, epsilon = 1e-12);
        assert!(normalize_bearing(-1e-300) < TAU);
    }

    #[test]
    fn distance_bearing_roundtrip() {
        let from = Point3::new(10.0, 20.0, 0.0);
        let to = from + distance_bearing_to_coordinates(5.0, 3.0);
        let (d, b) = coordinates_to_distance_bearing(&from, &to);
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn delta_from_bearing_pair() {
        let (rot, delta) = delta_from_bearings(0.5, 1.0);
        assert_eq!(rot, Rotation::Cw);
        assert_abs_diff_eq!(delta, 0.5, epsilon = 1e-12);

        let (rot, delta) = delta_from_bearings(0.2, TAU - 0.2);
        assert_eq!(rot, Rotation::Ccw);
        assert_abs_diff_eq!(delta, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn rotation_sign_roundtrip() {
        assert_eq!(Rotation::from_sign(Rotation::Ccw.sign()), Some(Rotation::Ccw));
        assert_eq!(Rotation::from_sign(1.0), Some(Rotation::Cw));
        assert_eq!(Rotation::from_sign(0.0), None);
    }
}
