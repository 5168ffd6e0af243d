use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::SMatrix;

use crate::error::ArcError;
use crate::geometry::ArcDescriptor;
use crate::math::bearing::{normalize_bearing, side_of_north};
use crate::math::{up, Point3, Vector3};

/// Role of a characteristic arc vector. The discriminant is its matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorRole {
    /// Center to start.
    RadiusStart,
    /// Center to end.
    RadiusEnd,
    /// Start to PI.
    TangentStart,
    /// PI to end.
    TangentEnd,
    /// Center to PI, bisecting the central angle.
    Internal,
    /// Start to end.
    Chord,
}

impl VectorRole {
    pub const ALL: [Self; 6] = [
        Self::RadiusStart,
        Self::RadiusEnd,
        Self::TangentStart,
        Self::TangentEnd,
        Self::Internal,
        Self::Chord,
    ];

    /// Matrix row / column of this role.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Every `(row, col)` pair of the strict lower triangle, row-major.
    pub fn lower_pairs() -> impl Iterator<Item = (Self, Self)> {
        (1..Self::ALL.len()).flat_map(|i| (0..i).map(move |j| (Self::ALL[i], Self::ALL[j])))
    }
}

/// Central angle implied by the angle between two vector roles, where
/// `row` comes after `col` in [`VectorRole::ALL`].
///
/// Pairs that are perpendicular for every arc (radius / tangent at the same
/// end, chord / internal) carry no information and return `None`.
#[must_use]
pub fn angle_relation(row: VectorRole, col: VectorRole, angle: f64) -> Option<f64> {
    use VectorRole::{Chord, Internal, RadiusEnd, RadiusStart, TangentEnd, TangentStart};

    match (row, col) {
        (RadiusEnd, RadiusStart) | (TangentEnd, TangentStart) => Some(angle),
        (TangentStart, RadiusEnd) => Some(FRAC_PI_2 - angle),
        (TangentEnd, RadiusStart) => Some(angle - FRAC_PI_2),
        (Internal, RadiusStart | RadiusEnd) | (Chord, TangentStart | TangentEnd) => {
            Some(2.0 * angle)
        }
        (Internal, TangentStart) | (Chord, RadiusEnd) => Some(PI - 2.0 * angle),
        (Internal, TangentEnd) | (Chord, RadiusStart) => Some(2.0 * angle - PI),
        _ => None,
    }
}

/// Bearing of the incoming tangent implied by the absolute bearing of a
/// vector of the given role.
#[must_use]
pub fn bearing_in_relation(role: VectorRole, bearing: f64, delta: f64, rotation: f64) -> f64 {
    let bearing_in = match role {
        VectorRole::RadiusStart => bearing + rotation * FRAC_PI_2,
        VectorRole::RadiusEnd => bearing + rotation * (FRAC_PI_2 - delta),
        VectorRole::TangentStart => bearing,
        VectorRole::TangentEnd => bearing - rotation * delta,
        VectorRole::Internal => bearing + rotation * (FRAC_PI_2 - delta / 2.0),
        VectorRole::Chord => bearing - rotation * (delta / 2.0),
    };
    normalize_bearing(bearing_in)
}

/// The six characteristic vectors of an arc, each absent unless both of its
/// endpoints are known.
#[derive(Debug, Clone, Default)]
pub struct ArcVectors {
    vectors: [Option<Vector3>; 6],
}

impl ArcVectors {
    /// Builds the vectors from whichever points the descriptor carries.
    #[must_use]
    pub fn from_descriptor(arc: &ArcDescriptor) -> Self {
        let between = |tail: Option<Point3>, head: Option<Point3>| match (tail, head) {
            (Some(t), Some(h)) => Some(Vector3::new(h.x - t.x, h.y - t.y, 0.0)),
            _ => None,
        };

        let vectors = [
            between(arc.center, arc.start),
            between(arc.center, arc.end),
            between(arc.start, arc.pi),
            between(arc.pi, arc.end),
            between(arc.center, arc.pi),
            between(arc.start, arc.end),
        ]
        // Coincident points give no direction; non-finite input is kept so
        // the matrix builder can reject it.
        .map(|v| v.filter(|v| v.iter().any(|c| !c.is_finite()) || v.norm() > f64::EPSILON));

        Self { vectors }
    }

    /// Returns the vector for a role, if known.
    #[must_use]
    pub fn get(&self, role: VectorRole) -> Option<&Vector3> {
        self.vectors[role.index()].as_ref()
    }
}

/// Lengths, pairwise central angles and bearings of the arc vectors.
///
/// Reduced from the Gram matrix of the six vectors plus the north reference:
/// the diagonal holds magnitudes, the strict lower triangle the central angle
/// implied by each pair, and the last row each vector's bearing.
#[derive(Debug, Clone)]
pub struct ScalarMatrix {
    values: SMatrix<f64, 7, 7>,
    present: [bool; 6],
}

impl ScalarMatrix {
    /// Raw matrix. Entries that depend on an absent vector are `NaN`.
    #[must_use]
    pub fn values(&self) -> &SMatrix<f64, 7, 7> {
        &self.values
    }

    /// Whether the vector for `role` was supplied.
    #[must_use]
    pub fn is_present(&self, role: VectorRole) -> bool {
        self.present[role.index()]
    }

    /// Magnitude of the vector for `role`.
    #[must_use]
    pub fn length(&self, role: VectorRole) -> Option<f64> {
        let i = role.index();
        self.present[i].then(|| self.values[(i, i)])
    }

    /// Central angle implied by a pair of roles, if both are present and the
    /// pair is informative.
    #[must_use]
    pub fn angle(&self, a: VectorRole, b: VectorRole) -> Option<f64> {
        let (i, j) = if a.index() > b.index() {
            (a.index(), b.index())
        } else {
            (b.index(), a.index())
        };
        if i == j {
            return None;
        }
        Some(self.values[(i, j)]).filter(|v| v.is_finite())
    }

    /// Absolute bearing of the vector for `role`.
    #[must_use]
    pub fn bearing(&self, role: VectorRole) -> Option<f64> {
        let j = role.index();
        Some(self.values[(6, j)]).filter(|v| self.present[j] && v.is_finite())
    }
}

/// Builds the scalar matrix.
///
/// # Errors
///
/// Returns [`ArcError::MalformedMatrix`] if any present vector has a
/// non-finite component.
pub fn build(vectors: &ArcVectors) -> Result<ScalarMatrix, ArcError> {
    if vectors
        .vectors
        .iter()
        .flatten()
        .any(|v| v.iter().any(|c| !c.is_finite()))
    {
        return Err(ArcError::MalformedMatrix);
    }

    let present = vectors.vectors.map(|v| v.is_some());
    let north = up();

    // Step 1: Absent vectors become zero rows, the north reference is row 6.
    let rows = SMatrix::<f64, 7, 3>::from_fn(|r, c| {
        if r < 6 {
            vectors.vectors[r].map_or(0.0, |v| v[c])
        } else {
            north[c]
        }
    });

    // Step 2: Gram matrix of every pair of rows.
    let mut values = rows * rows.transpose();

    // Step 3: Magnitudes on the diagonal.
    for i in 0..6 {
        values[(i, i)] = if present[i] {
            values[(i, i)].sqrt()
        } else {
            f64::NAN
        };
    }

    // Step 4: Pairwise central angles, mirrored to keep the matrix symmetric.
    for i in 1..6 {
        for j in 0..i {
            let angle = if present[i] && present[j] {
                let cos = values[(i, j)] / (values[(i, i)] * values[(j, j)]);
                angle_relation(VectorRole::ALL[i], VectorRole::ALL[j], cos.clamp(-1.0, 1.0).acos())
                    .unwrap_or(f64::NAN)
            } else {
                f64::NAN
            };
            values[(i, j)] = angle;
            values[(j, i)] = angle;
        }
    }

    // Step 5: Bearings against north, signed by the side of north.
    for j in 0..6 {
        let bearing = match vectors.vectors[j] {
            Some(v) if present[j] => {
                let cos = values[(6, j)] / values[(j, j)];
                let mut angle = cos.clamp(-1.0, 1.0).acos() * side_of_north(&v);
                if angle < 0.0 {
                    angle += TAU;
                }
                normalize_bearing(angle)
            }
            _ => f64::NAN,
        };
        values[(6, j)] = bearing;
        values[(j, 6)] = bearing;
    }

    Ok(ScalarMatrix { values, present })
}
