pub mod bearing;

/// 3D point type. Horizontal geometry keeps `z` at zero.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Absolute tolerance for comparisons in internal units (millimeters, radians).
pub const TOLERANCE: f64 = 1e-4;

/// Reference direction for bearings (true north).
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Returns `true` iff every value is present, finite and all values lie
/// within [`TOLERANCE`] of each other.
///
/// An absent value can never be confirmed, so any `None` yields `false`.
/// So does an empty input.
pub fn within_tolerance<I>(values: I) -> bool
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut count = 0usize;

    for value in values {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return false;
        };
        min = min.min(v);
        max = max.max(v);
        count += 1;
    }

    count > 0 && max - min < TOLERANCE
}

/// Keeps `supplied` when it confirms `computed`, otherwise returns `computed`.
#[must_use]
pub fn confirm(computed: f64, supplied: Option<f64>) -> f64 {
    match supplied {
        Some(s) if within_tolerance([Some(computed), Some(s)]) => s,
        _ => computed,
    }
}

/// Filters a user-supplied scalar down to a usable positive value.
#[must_use]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
