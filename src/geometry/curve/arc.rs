use crate::error::Result;
use crate::math::bearing::{normalize_bearing, vector_from_bearing, Rotation};
use crate::math::{Point3, Vector3};

use super::{check_distance, Curve};

/// A sparse description of a horizontal circular arc.
///
/// Any subset of fields may be present; [`crate::operations::ResolveArc`]
/// derives the rest. Lengths are in millimeters and angles in radians unless
/// the descriptor has been converted with
/// [`ArcDescriptor::to_document`](crate::units).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcDescriptor {
    /// Point of curvature (PC).
    pub start: Option<Point3>,
    /// Point of tangency (PT).
    pub end: Option<Point3>,
    pub center: Option<Point3>,
    /// Point of intersection of the two tangents (PI).
    pub pi: Option<Point3>,
    pub radius: Option<f64>,
    /// Distance from PC (or PT) to PI.
    pub tangent: Option<f64>,
    /// Straight-line distance from PC to PT.
    pub chord: Option<f64>,
    /// Middle ordinate.
    pub middle: Option<f64>,
    /// External distance.
    pub external: Option<f64>,
    /// Arc length.
    pub length: Option<f64>,
    /// Central angle.
    pub delta: Option<f64>,
    pub bearing_in: Option<f64>,
    pub bearing_out: Option<f64>,
    pub direction: Option<Rotation>,
}

impl ArcDescriptor {
    /// Returns the four defining points in `[start, end, center, pi]` order.
    #[must_use]
    pub fn points(&self) -> [Option<Point3>; 4] {
        [self.start, self.end, self.center, self.pi]
    }

    /// Number of points present.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points().iter().flatten().count()
    }
}

/// A fully resolved, internally consistent circular arc.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArc {
    pub start: Point3,
    pub end: Point3,
    pub center: Point3,
    pub pi: Point3,
    pub radius: f64,
    pub tangent: f64,
    pub chord: f64,
    pub middle: f64,
    pub external: f64,
    pub length: f64,
    pub delta: f64,
    pub bearing_in: f64,
    pub bearing_out: f64,
    pub direction: Rotation,
}

impl ResolvedArc {
    /// Converts back into a (fully populated) descriptor.
    #[must_use]
    pub fn descriptor(&self) -> ArcDescriptor {
        ArcDescriptor {
            start: Some(self.start),
            end: Some(self.end),
            center: Some(self.center),
            pi: Some(self.pi),
            radius: Some(self.radius),
            tangent: Some(self.tangent),
            chord: Some(self.chord),
            middle: Some(self.middle),
            external: Some(self.external),
            length: Some(self.length),
            delta: Some(self.delta),
            bearing_in: Some(self.bearing_in),
            bearing_out: Some(self.bearing_out),
            direction: Some(self.direction),
        }
    }

    /// Degree of curvature (arc definition) in radians for the given station
    /// length: the central angle subtended by one station of arc.
    #[must_use]
    pub fn degree_of_curve(&self, station_length: f64) -> f64 {
        station_length / self.radius
    }

    /// Point reached after turning through `angle` from the start.
    pub(crate) fn point_at_angle(&self, angle: f64) -> Point3 {
        let forward = vector_from_bearing(self.bearing_in);
        let right = Vector3::new(forward.y, -forward.x, 0.0);
        let offset =
            forward * angle.sin() + right * (self.direction.sign() * (1.0 - angle.cos()));
        self.start + offset * self.radius
    }
}

impl Curve for ResolvedArc {
    fn length(&self) -> f64 {
        self.length
    }

    fn point_at(&self, distance: f64) -> Result<Point3> {
        let distance = check_distance(distance, self.length)?;
        Ok(self.point_at_angle(distance / self.radius))
    }

    fn bearing_at(&self, distance: f64) -> Result<f64> {
        let distance = check_distance(distance, self.length)?;
        Ok(normalize_bearing(
            self.bearing_in + self.direction.sign() * distance / self.radius,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Quarter circle, radius 10, heading north and turning right.
    fn quarter_cw() -> ResolvedArc {
        let r = 10.0;
        let delta = FRAC_PI_2;
        ResolvedArc {
            start: Point3::origin(),
            end: Point3::new(10.0, 10.0, 0.0),
            center: Point3::new(10.0, 0.0, 0.0),
            pi: Point3::new(0.0, 10.0, 0.0),
            radius: r,
            tangent: r,
            chord: 2.0 * r * (delta / 2.0).sin(),
            middle: r * (1.0 - (delta / 2.0).cos()),
            external: r * (1.0 / (delta / 2.0).cos() - 1.0),
            length: r * delta,
            delta,
            bearing_in: 0.0,
            bearing_out: FRAC_PI_2,
            direction: Rotation::Cw,
        }
    }

    #[test]
    fn point_at_end_matches_end() {
        let arc = quarter_cw();
        let p = arc.point_at(arc.length).unwrap();
        assert_abs_diff_eq!(p, arc.end, epsilon = 1e-9);
    }

    #[test]
    fn points_stay_on_circle() {
        let arc = quarter_cw();
        for i in 0..=10 {
            let p = arc.point_at(arc.length * f64::from(i) / 10.0).unwrap();
            assert_abs_diff_eq!((p - arc.center).norm(), arc.radius, epsilon = 1e-9);
        }
    }

    #[test]
    fn bearing_turns_with_direction() {
        let arc = quarter_cw();
        assert_abs_diff_eq!(arc.bearing_at(arc.length).unwrap(), FRAC_PI_2, epsilon = 1e-12);

        let mut left = arc.clone();
        left.direction = Rotation::Ccw;
        assert_abs_diff_eq!(
            left.bearing_at(left.length).unwrap(),
            2.0 * PI - FRAC_PI_2,
            epsilon = 1e-12
        );
        let p = left.point_at(left.length).unwrap();
        assert_abs_diff_eq!(p, Point3::new(-10.0, 10.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn distance_out_of_range_is_rejected() {
        let arc = quarter_cw();
        assert!(arc.point_at(-1.0).is_err());
        assert!(arc.bearing_at(arc.length + 1.0).is_err());
    }

    #[test]
    fn descriptor_is_fully_populated() {
        let d = quarter_cw().descriptor();
        assert_eq!(d.point_count(), 4);
        assert_eq!(d.direction, Some(Rotation::Cw));
        assert_eq!(d.radius, Some(10.0));
    }
}
