use std::iter::FusedIterator;

use crate::error::{ArcError, Result};
use crate::geometry::ResolvedArc;
use crate::math::Point3;

use super::{Polyline, Subdivision, TessellationParams};

/// Tessellates a resolved arc into a polyline.
#[derive(Debug)]
pub struct TessellateArc<'a> {
    arc: &'a ResolvedArc,
    params: TessellationParams,
}

impl<'a> TessellateArc<'a> {
    /// Creates a new `TessellateArc` operation.
    #[must_use]
    pub fn new(arc: &'a ResolvedArc, params: TessellationParams) -> Self {
        Self { arc, params }
    }

    /// Returns the points after the start point, ending exactly on the end
    /// point.
    ///
    /// # Errors
    ///
    /// Returns [`ArcError::InvalidSubdivision`] if the arc or the subdivision
    /// is degenerate, or if more than `max_segments` segments are needed.
    pub fn points(&self) -> Result<ArcPoints<'a>> {
        let (step, count) = self.step_and_count()?;
        Ok(ArcPoints {
            arc: self.arc,
            step,
            next: 1,
            count,
        })
    }

    /// Executes the tessellation, returning a polyline from start to end.
    ///
    /// # Errors
    ///
    /// Same as [`TessellateArc::points`].
    pub fn execute(&self) -> Result<Polyline> {
        let points = self.points()?;
        let mut polyline = Polyline {
            points: Vec::with_capacity(points.len() + 1),
        };
        polyline.points.push(self.arc.start);
        polyline.points.extend(points);
        Ok(polyline)
    }

    fn step_and_count(&self) -> std::result::Result<(f64, usize), ArcError> {
        let ResolvedArc { radius, delta, .. } = *self.arc;
        if !(radius.is_finite() && radius > 0.0 && delta.is_finite() && delta > 0.0) {
            return Err(ArcError::InvalidSubdivision(format!(
                "degenerate arc (radius {radius}, delta {delta})"
            )));
        }

        let step = match self.params.subdivision {
            Subdivision::Segments(0) => {
                return Err(ArcError::InvalidSubdivision("zero segments".to_owned()));
            }
            #[allow(clippy::cast_precision_loss)]
            Subdivision::Segments(n) => delta / n as f64,
            Subdivision::Interval(length) => positive("interval", length)? / radius,
            Subdivision::Tolerance(tolerance) => {
                let t = positive("tolerance", tolerance)?;
                2.0 * (1.0 - t / radius).clamp(-1.0, 1.0).acos()
            }
        };

        // 1e-9 keeps exact multiples from gaining a sliver segment
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = ((delta / step - 1e-9).ceil() as usize).max(1);
        if count > self.params.max_segments {
            return Err(ArcError::InvalidSubdivision(format!(
                "{count} segments exceed the maximum of {}",
                self.params.max_segments
            )));
        }

        Ok((step, count))
    }
}

fn positive(name: &str, value: f64) -> std::result::Result<f64, ArcError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ArcError::InvalidSubdivision(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Points along an arc, from the start (exclusive) to the end (inclusive).
#[derive(Debug)]
pub struct ArcPoints<'a> {
    arc: &'a ResolvedArc,
    step: f64,
    next: usize,
    count: usize,
}

impl Iterator for ArcPoints<'_> {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if self.next > self.count {
            return None;
        }
        let i = self.next;
        self.next += 1;

        // Pin the last angle to delta so step error never accumulates.
        #[allow(clippy::cast_precision_loss)]
        let angle = if i == self.count {
            self.arc.delta
        } else {
            i as f64 * self.step
        };
        Some(self.arc.point_at_angle(angle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcPoints<'_> {}

impl FusedIterator for ArcPoints<'_> {}
