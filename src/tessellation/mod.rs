mod tessellate_arc;

pub use tessellate_arc::{ArcPoints, TessellateArc};

use crate::math::Point3;

/// How an arc is split into chords.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Subdivision {
    /// A fixed number of equal segments.
    Segments(usize),
    /// A fixed arc length per segment; the last segment may be shorter.
    Interval(f64),
    /// The largest segments whose middle ordinate stays within the given
    /// chordal deviation.
    Tolerance(f64),
}

impl Default for Subdivision {
    fn default() -> Self {
        Self::Tolerance(1.0)
    }
}

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    pub subdivision: Subdivision,
    /// Maximum number of segments for a single curve.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            subdivision: Subdivision::default(),
            max_segments: 4096,
        }
    }
}

/// A polyline approximation of a curve.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point3>,
}
