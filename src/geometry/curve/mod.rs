mod arc;
mod line;

pub use arc::{ArcDescriptor, ResolvedArc};
pub use line::Tangent;

use crate::error::{GeometryError, Result};
use crate::math::Point3;

/// A horizontal alignment curve parameterized by distance along it.
pub trait Curve {
    /// Returns the length of the curve.
    fn length(&self) -> f64;

    /// Evaluates the point at `distance` from the start of the curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` is outside `[0, length]`.
    fn point_at(&self, distance: f64) -> Result<Point3>;

    /// Returns the forward bearing at `distance` from the start of the curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` is outside `[0, length]`.
    fn bearing_at(&self, distance: f64) -> Result<f64>;
}

/// Validates a distance parameter against `[0, length]`, allowing
/// [`crate::math::TOLERANCE`] of slack at both ends.
pub(crate) fn check_distance(distance: f64, length: f64) -> Result<f64> {
    let slack = crate::math::TOLERANCE;
    if !(-slack..=length + slack).contains(&distance) {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "distance",
            value: distance,
            min: 0.0,
            max: length,
        }
        .into());
    }
    Ok(distance.clamp(0.0, length))
}
