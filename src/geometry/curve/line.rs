use crate::error::{GeometryError, Result};
use crate::math::bearing::{coordinates_to_distance_bearing, vector_from_bearing};
use crate::math::{Point3, TOLERANCE};

use super::{check_distance, Curve};

/// A straight tangent segment defined by a start point, bearing and length.
#[derive(Debug, Clone, PartialEq)]
pub struct Tangent {
    start: Point3,
    bearing: f64,
    length: f64,
}

impl Tangent {
    /// Creates a new tangent segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not positive.
    pub fn new(start: Point3, bearing: f64, length: f64) -> Result<Self> {
        if !(length.is_finite() && length > TOLERANCE) {
            return Err(GeometryError::Degenerate("tangent length must be positive".into()).into());
        }
        Ok(Self {
            start,
            bearing,
            length,
        })
    }

    /// Creates a tangent segment between two points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn from_points(start: Point3, end: Point3) -> Result<Self> {
        let (length, bearing) = coordinates_to_distance_bearing(&start, &end);
        Self::new(start, bearing, length)
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.start + vector_from_bearing(self.bearing) * self.length
    }

    /// Returns the bearing of the segment.
    #[must_use]
    pub fn bearing(&self) -> f64 {
        self.bearing
    }
}

impl Curve for Tangent {
    fn length(&self) -> f64 {
        self.length
    }

    fn point_at(&self, distance: f64) -> Result<Point3> {
        let distance = check_distance(distance, self.length)?;
        Ok(self.start + vector_from_bearing(self.bearing) * distance)
    }

    fn bearing_at(&self, distance: f64) -> Result<f64> {
        check_distance(distance, self.length)?;
        Ok(self.bearing)
    }
}
