use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::bearing::vector_from_bearing;
use crate::math::Point3;

use super::bearings::Bearings;
use super::parameters::Parameters;

/// The four defining points of an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub start: Point3,
    pub end: Point3,
    pub center: Point3,
    pub pi: Point3,
}

/// Completes the point set from whichever point is known.
///
/// The start point anchors the construction; when it is missing it is
/// recovered from the PI, then the center, then the end.
///
/// # Errors
///
/// Returns [`ArcError::Coordinates`] if the descriptor carries no point.
pub fn resolve(
    arc: &ArcDescriptor,
    params: &Parameters,
    bearings: &Bearings,
) -> Result<Coordinates, ArcError> {
    let radius = vector_from_bearing(bearings.radius_start) * params.radius;
    let tangent = vector_from_bearing(bearings.bearing_in) * params.tangent;
    let chord = vector_from_bearing(bearings.chord) * params.chord;

    let start = arc
        .start
        .or_else(|| arc.pi.map(|p| p - tangent))
        .or_else(|| arc.center.map(|c| c + radius))
        .or_else(|| arc.end.map(|e| e - chord))
        .ok_or(ArcError::Coordinates)?;

    Ok(Coordinates {
        start,
        end: arc.end.unwrap_or(start + chord),
        center: arc.center.unwrap_or(start - radius),
        pi: arc.pi.unwrap_or(start + tangent),
    })
}
