use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::{confirm, positive};

use super::lengths::Lengths;

/// Scalar parameters of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub radius: f64,
    pub tangent: f64,
    pub chord: f64,
    pub middle: f64,
    pub external: f64,
    pub length: f64,
}

impl Parameters {
    /// Closed-form parameters of an arc with the given radius and central
    /// angle.
    #[must_use]
    pub fn from_radius(radius: f64, delta: f64) -> Self {
        let half = delta / 2.0;
        Self {
            radius,
            tangent: radius * half.tan(),
            chord: 2.0 * radius * half.sin(),
            middle: radius * (1.0 - half.cos()),
            external: radius * (1.0 / half.cos() - 1.0),
            length: radius * delta,
        }
    }
}

/// Computes every scalar parameter from radius and delta, keeping supplied
/// values that agree with the computed ones.
///
/// Without a measured or supplied radius, the radius is recovered from the
/// first supplied arc length, tangent or chord.
///
/// # Errors
///
/// Returns [`ArcError::Parameters`] if no radius can be established.
pub fn resolve(arc: &ArcDescriptor, lengths: &Lengths, delta: f64) -> Result<Parameters, ArcError> {
    let half = delta / 2.0;
    let tangent = lengths.tangent.or_else(|| positive(arc.tangent));
    let chord = lengths.chord.or_else(|| positive(arc.chord));

    let radius = lengths
        .radius
        .or_else(|| positive(arc.length).map(|l| l / delta))
        .or_else(|| tangent.map(|t| t / half.tan()))
        .or_else(|| chord.map(|c| c / (2.0 * half.sin())))
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or(ArcError::Parameters)?;

    let computed = Parameters::from_radius(radius, delta);
    let Parameters {
        radius,
        tangent: computed_tangent,
        chord: computed_chord,
        middle,
        external,
        length,
    } = computed;

    Ok(Parameters {
        radius,
        tangent: confirm(computed_tangent, tangent),
        chord: confirm(computed_chord, chord),
        middle: confirm(middle, positive(arc.middle)),
        external: confirm(external, positive(arc.external)),
        length: confirm(length, positive(arc.length)),
    })
}
