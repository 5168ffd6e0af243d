use std::f64::consts::PI;

use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::bearing::{bearings_within_tolerance, normalize_bearing, Rotation};

use super::matrix::{bearing_in_relation, ScalarMatrix, VectorRole};

/// Tangent bearings plus the bearings of the vectors used to place points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearings {
    pub bearing_in: f64,
    pub bearing_out: f64,
    /// Center to start.
    pub radius_start: f64,
    /// Center to end.
    pub radius_end: f64,
    /// Center to PI.
    pub internal: f64,
    /// Start to end.
    pub chord: f64,
}

/// Resolves the bearing in from every measured vector bearing and the
/// supplied bearings, then derives the rest.
///
/// # Errors
///
/// Returns [`ArcError::Bearings`] if the measured bearings imply different
/// bearings in, or if no bearing is known at all.
pub fn resolve(
    arc: &ArcDescriptor,
    mat: &ScalarMatrix,
    delta: f64,
    rotation: Rotation,
) -> Result<Bearings, ArcError> {
    let sign = rotation.sign();

    // Step 1: Every measured vector implies a bearing in.
    let candidates: Vec<(VectorRole, f64)> = VectorRole::ALL
        .into_iter()
        .filter_map(|role| {
            mat.bearing(role)
                .map(|b| (role, bearing_in_relation(role, b, delta, sign)))
        })
        .collect();

    for (i, &(role_a, a)) in candidates.iter().enumerate() {
        for &(role_b, b) in &candidates[..i] {
            if !bearings_within_tolerance(Some(a), Some(b)) {
                return Err(ArcError::Bearings(format!(
                    "inconsistent curve definition: {role_a:?} and {role_b:?} disagree"
                )));
            }
        }
    }

    // Step 2: Measured bearings take precedence over supplied ones.
    let supplied_in = arc.bearing_in.filter(|b| b.is_finite()).map(normalize_bearing);
    let supplied_out = arc.bearing_out.filter(|b| b.is_finite()).map(normalize_bearing);
    let bearing_in = match (candidates.first(), supplied_in) {
        (Some(&(_, measured)), Some(b)) if bearings_within_tolerance(Some(measured), Some(b)) => b,
        (Some(&(_, measured)), _) => measured,
        (None, Some(b)) => b,
        (None, None) => supplied_out
            .map(|out| normalize_bearing(out - sign * delta))
            .ok_or_else(|| ArcError::Bearings("no bearing or oriented vector given".to_owned()))?,
    };

    let computed_out = normalize_bearing(bearing_in + sign * delta);
    let bearing_out = match supplied_out {
        Some(b) if bearings_within_tolerance(Some(computed_out), Some(b)) => b,
        _ => computed_out,
    };

    // Step 3: Vector bearings, measured where possible.
    let radius_start = mat
        .bearing(VectorRole::RadiusStart)
        .unwrap_or_else(|| normalize_bearing(bearing_in - sign * PI / 2.0));
    let radius_end = mat
        .bearing(VectorRole::RadiusEnd)
        .unwrap_or_else(|| normalize_bearing(radius_start + sign * delta));
    let internal = mat
        .bearing(VectorRole::Internal)
        .unwrap_or_else(|| normalize_bearing(radius_start + sign * delta / 2.0));
    let chord = mat
        .bearing(VectorRole::Chord)
        .unwrap_or_else(|| normalize_bearing(radius_start + sign * (PI + delta) / 2.0));

    Ok(Bearings {
        bearing_in,
        bearing_out,
        radius_start,
        radius_end,
        internal,
        chord,
    })
}
