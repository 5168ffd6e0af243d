use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::positive;

use super::matrix::{ScalarMatrix, VectorRole};

/// Resolves the central angle: the first informative pair in the matrix's
/// lower triangle (row-major), else the supplied delta.
///
/// # Errors
///
/// Returns [`ArcError::CentralAngle`] if neither source yields a positive
/// angle.
pub fn resolve(arc: &ArcDescriptor, mat: &ScalarMatrix) -> Result<f64, ArcError> {
    let measured = VectorRole::lower_pairs()
        .find_map(|(row, col)| mat.angle(row, col).filter(|a| *a > 0.0));

    measured
        .or_else(|| positive(arc.delta))
        .ok_or(ArcError::CentralAngle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::resolve::matrix::tests::arc_points;
    use crate::operations::resolve::matrix::{build, ArcVectors};

    fn delta_of(arc: &ArcDescriptor) -> Result<f64, ArcError> {
        resolve(arc, &build(&ArcVectors::from_descriptor(arc)).unwrap())
    }

    #[test]
    fn measured_delta_wins_over_user() {
        let mut arc = arc_points(100.0, 0.6, 0.3, -1.0);
        arc.delta = Some(0.7);
        assert!((delta_of(&arc).unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn single_vector_falls_back_to_user() {
        let arc = ArcDescriptor {
            start: Some(Point3::origin()),
            end: Some(Point3::new(10.0, 0.0, 0.0)),
            delta: Some(0.25),
            ..ArcDescriptor::default()
        };
        assert_eq!(delta_of(&arc).unwrap(), 0.25);
    }

    #[test]
    fn no_source_fails() {
        let arc = ArcDescriptor {
            start: Some(Point3::origin()),
            delta: Some(0.0),
            ..ArcDescriptor::default()
        };
        assert_eq!(delta_of(&arc), Err(ArcError::CentralAngle));
    }
}
