use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::{confirm, positive, within_tolerance};

use super::matrix::{ScalarMatrix, VectorRole};

/// Radius, tangent and chord after comparing measured vector magnitudes
/// with the supplied values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lengths {
    pub radius: Option<f64>,
    pub tangent: Option<f64>,
    pub chord: Option<f64>,
}

/// Resolves lengths from the matrix diagonal.
///
/// # Errors
///
/// Returns [`ArcError::RadiusTangent`] when the two measured radii or the two
/// measured tangents disagree.
pub fn resolve(arc: &ArcDescriptor, mat: &ScalarMatrix) -> Result<Lengths, ArcError> {
    let radius = reconcile_pair(
        "radius",
        mat.length(VectorRole::RadiusStart),
        mat.length(VectorRole::RadiusEnd),
        positive(arc.radius),
    )?;
    let tangent = reconcile_pair(
        "tangent",
        mat.length(VectorRole::TangentStart),
        mat.length(VectorRole::TangentEnd),
        positive(arc.tangent),
    )?;

    let supplied_chord = positive(arc.chord);
    let chord = mat
        .length(VectorRole::Chord)
        .map_or(supplied_chord, |measured| Some(confirm(measured, supplied_chord)));

    Ok(Lengths {
        radius,
        tangent,
        chord,
    })
}

fn reconcile_pair(
    name: &str,
    first: Option<f64>,
    second: Option<f64>,
    supplied: Option<f64>,
) -> Result<Option<f64>, ArcError> {
    if let (Some(a), Some(b)) = (first, second) {
        if !within_tolerance([first, second]) {
            return Err(ArcError::RadiusTangent(format!(
                "measured {name} values {a:.4} and {b:.4} disagree"
            )));
        }
    }

    Ok(match first.or(second) {
        Some(measured) => Some(confirm(measured, supplied)),
        None => supplied,
    })
}
