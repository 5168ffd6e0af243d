mod bearings;
mod coordinates;
mod delta;
mod lengths;
mod matrix;
mod parameters;
mod rotation;

pub use parameters::Parameters;

use crate::error::{ArcError, Result};
use crate::geometry::{ArcDescriptor, ResolvedArc};

use matrix::ArcVectors;

/// Reconstructs a complete circular arc from any sufficient subset of its
/// points, lengths and angles.
///
/// Redundant inputs are cross-checked: measured values take precedence and
/// supplied values are kept only where they agree within
/// [`crate::math::TOLERANCE`].
#[derive(Debug)]
pub struct ResolveArc {
    arc: ArcDescriptor,
}

impl ResolveArc {
    /// Creates a new resolve operation.
    #[must_use]
    pub fn new(arc: ArcDescriptor) -> Self {
        Self { arc }
    }

    /// Executes the resolution.
    ///
    /// # Errors
    ///
    /// Returns the [`ArcError`] of the first stage that cannot complete:
    /// mismatched or missing lengths, central angle, direction, bearings,
    /// scalar parameters or coordinates.
    pub fn execute(&self) -> Result<ResolvedArc> {
        self.run().map_err(|e| {
            tracing::debug!(stage = ?e.stage(), error = %e, "curve resolution failed");
            e.into()
        })
    }

    fn run(&self) -> std::result::Result<ResolvedArc, ArcError> {
        let arc = &self.arc;

        // Step 1: Vector magnitudes, pairwise angles and bearings.
        let vectors = ArcVectors::from_descriptor(arc);
        let mat = matrix::build(&vectors)?;

        // Step 2: Radius, tangent and chord.
        let lengths = lengths::resolve(arc, &mat)?;

        // Step 3: Central angle.
        let delta = delta::resolve(arc, &mat)?;

        // Step 4: Direction of rotation.
        let direction = rotation::resolve(arc, &vectors)?;

        // Step 5: Tangent and vector bearings.
        let bearings = bearings::resolve(arc, &mat, delta, direction)?;

        // Step 6: Remaining scalar parameters.
        let params = parameters::resolve(arc, &lengths, delta)?;

        // Step 7: Missing points.
        let points = coordinates::resolve(arc, &params, &bearings)?;

        tracing::trace!(
            radius = params.radius,
            delta,
            ?direction,
            points = arc.point_count(),
            "curve resolved"
        );

        Ok(ResolvedArc {
            start: points.start,
            end: points.end,
            center: points.center,
            pi: points.pi,
            radius: params.radius,
            tangent: params.tangent,
            chord: params.chord,
            middle: params.middle,
            external: params.external,
            length: params.length,
            delta,
            bearing_in: bearings.bearing_in,
            bearing_out: bearings.bearing_out,
            direction,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::error::GeoalignError;
    use crate::math::bearing::{bearing_difference, Rotation};
    use crate::math::Point3;
    use approx::assert_abs_diff_eq;

    const FOOT: f64 = 304.8;

    /// Left-hand curve of radius 670 ft, in millimeters.
    pub(crate) fn reference_arc() -> ArcDescriptor {
        let radius = 670.0 * FOOT;
        let delta = 50.3161f64.to_radians();
        let p = Parameters::from_radius(radius, delta);
        ArcDescriptor {
            start: Some(Point3::new(122_056.060_364_006_2, -142_398.207_174_963_06, 0.0)),
            end: Some(Point3::new(280_378.214_187_628_1, -213_685.728_067_274_8, 0.0)),
            center: Some(Point3::new(277_108.162_293_279_7, -9_495.910_944_558_627, 0.0)),
            pi: Some(Point3::new(184_476.321_633_248_04, -215_221.574_319_737_85, 0.0)),
            radius: Some(radius),
            tangent: Some(p.tangent),
            chord: Some(p.chord),
            middle: Some(p.middle),
            external: Some(p.external),
            length: Some(p.length),
            delta: Some(delta),
            bearing_in: Some(139.3986f64.to_radians()),
            bearing_out: Some(89.0825f64.to_radians()),
            direction: Some(Rotation::Ccw),
        }
    }

    fn assert_matches(resolved: &ResolvedArc, expected: &ArcDescriptor) {
        let tol = crate::math::TOLERANCE;
        for (got, want) in [
            (resolved.start, expected.start),
            (resolved.end, expected.end),
            (resolved.center, expected.center),
            (resolved.pi, expected.pi),
        ] {
            assert_abs_diff_eq!(got, want.unwrap(), epsilon = tol);
        }
        for (got, want) in [
            (resolved.radius, expected.radius),
            (resolved.tangent, expected.tangent),
            (resolved.chord, expected.chord),
            (resolved.middle, expected.middle),
            (resolved.external, expected.external),
            (resolved.length, expected.length),
            (resolved.delta, expected.delta),
        ] {
            assert_abs_diff_eq!(got, want.unwrap(), epsilon = tol);
        }
        assert!(bearing_difference(resolved.bearing_in, expected.bearing_in.unwrap()) < tol);
        assert!(bearing_difference(resolved.bearing_out, expected.bearing_out.unwrap()) < tol);
        assert_eq!(Some(resolved.direction), expected.direction);
    }

    #[test]
    fn fully_specified_arc_round_trips() {
        let arc = reference_arc();
        let resolved = ResolveArc::new(arc.clone()).execute().unwrap();
        assert_matches(&resolved, &arc);
        // agreeing supplied values are returned unchanged
        assert_eq!(resolved.radius, arc.radius.unwrap());
        assert_eq!(resolved.bearing_in, arc.bearing_in.unwrap());
    }

    #[test]
    fn single_point_reconstruction() {
        let reference = reference_arc();
        let sparse = ArcDescriptor {
            start: reference.start,
            radius: reference.radius,
            delta: reference.delta,
            direction: reference.direction,
            bearing_in: reference.bearing_in,
            ..ArcDescriptor::default()
        };
        let resolved = ResolveArc::new(sparse).execute().unwrap();
        assert_matches(&resolved, &reference);
    }

    #[test]
    fn any_point_subset_reconstructs() {
        let reference = reference_arc();
        for mask in 0u8..16 {
            let mut arc = reference.clone();
            let slots = [&mut arc.start, &mut arc.end, &mut arc.center, &mut arc.pi];
            for (bit, slot) in slots.into_iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    *slot = None;
                }
            }

            let result = ResolveArc::new(arc).execute();
            if mask == 0b1111 {
                assert!(matches!(
                    result,
                    Err(GeoalignError::Arc(ArcError::Coordinates))
                ));
            } else {
                assert_matches(&result.unwrap(), &reference);
            }
        }
    }

    #[test]
    fn points_alone_determine_the_arc() {
        let reference = reference_arc();
        let arc = ArcDescriptor {
            start: reference.start,
            end: reference.end,
            center: reference.center,
            pi: reference.pi,
            ..ArcDescriptor::default()
        };
        let resolved = ResolveArc::new(arc).execute().unwrap();
        assert_matches(&resolved, &reference);
    }

    #[test]
    fn mismatched_points_are_rejected() {
        let mut arc = reference_arc();
        let end = arc.end.unwrap();
        arc.end = Some(Point3::new(end.x + 50.0, end.y, 0.0));

        let err = ResolveArc::new(arc).execute().unwrap_err();
        assert!(matches!(err, GeoalignError::Arc(ArcError::RadiusTangent(_))));
    }

    #[test]
    fn mirrored_arc_turns_clockwise() {
        let reference = reference_arc();
        let mirror = |p: Option<Point3>| p.map(|p| Point3::new(-p.x, p.y, 0.0));
        let mut mirrored = reference.clone();
        mirrored.start = mirror(reference.start);
        mirrored.end = mirror(reference.end);
        mirrored.center = mirror(reference.center);
        mirrored.pi = mirror(reference.pi);
        mirrored.bearing_in = Some(220.6014f64.to_radians());
        mirrored.bearing_out = Some(270.9175f64.to_radians());
        mirrored.direction = Some(Rotation::Cw);

        let resolved = ResolveArc::new(mirrored.clone()).execute().unwrap();
        assert_matches(&resolved, &mirrored);
    }

    #[test]
    fn underdetermined_arc_reports_stage() {
        let arc = ArcDescriptor {
            start: reference_arc().start,
            radius: Some(100.0),
            ..ArcDescriptor::default()
        };
        let err = ResolveArc::new(arc).execute().unwrap_err();
        assert!(matches!(err, GeoalignError::Arc(ArcError::CentralAngle)));
    }
}
