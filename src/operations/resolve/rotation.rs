use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::bearing::{rotation_between, Rotation};

use super::matrix::{ArcVectors, VectorRole};

/// `(in, out)` role pairs whose turn equals the curve's turn for any
/// central angle below `π`. Half-angle pairs come first; they stay
/// unambiguous up to a full circle.
const TURN_PAIRS: [(VectorRole, VectorRole); 6] = [
    (VectorRole::RadiusStart, VectorRole::Internal),
    (VectorRole::Internal, VectorRole::RadiusEnd),
    (VectorRole::TangentStart, VectorRole::Chord),
    (VectorRole::Chord, VectorRole::TangentEnd),
    (VectorRole::RadiusStart, VectorRole::RadiusEnd),
    (VectorRole::TangentStart, VectorRole::TangentEnd),
];

/// Resolves the direction of rotation from the first available in/out
/// vector pair, falling back to the supplied direction.
///
/// # Errors
///
/// Returns [`ArcError::Direction`] if no pair is available and no direction
/// was supplied.
pub fn resolve(arc: &ArcDescriptor, vectors: &ArcVectors) -> Result<Rotation, ArcError> {
    let measured = TURN_PAIRS.iter().find_map(|&(a, b)| {
        let (v_in, v_out) = (vectors.get(a)?, vectors.get(b)?);
        rotation_between(v_in, v_out)
    });

    if let (Some(m), Some(supplied)) = (measured, arc.direction) {
        if m != supplied {
            tracing::debug!(?supplied, measured = ?m, "supplied curve direction overridden");
        }
    }

    measured.or(arc.direction).ok_or(ArcError::Direction)
}
