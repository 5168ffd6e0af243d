use crate::error::{GeometryError, Result};
use crate::geometry::{Curve, ResolvedArc, SpiralParams, Tangent};
use crate::math::bearing::{normalize_bearing, vector_from_bearing};
use crate::math::Point3;

/// Descriptive attributes carried by every geometry element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMeta {
    pub name: Option<String>,
    pub description: Option<String>,
    pub object_id: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
    /// Station of the element start, in millimeters, if given explicitly.
    pub start_station: Option<f64>,
}

/// A straight segment of an alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct LineElement {
    pub meta: ElementMeta,
    pub tangent: Tangent,
}

impl LineElement {
    /// Builds a line from whichever of start, end, bearing and length are
    /// known. Both points win over bearing and length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the line cannot be located or
    /// has no length.
    pub fn from_parts(
        meta: ElementMeta,
        start: Option<Point3>,
        end: Option<Point3>,
        bearing: Option<f64>,
        length: Option<f64>,
    ) -> Result<Self> {
        let bearing = bearing.filter(|b| b.is_finite()).map(normalize_bearing);
        let length = length.filter(|l| l.is_finite() && *l > 0.0);

        let tangent = match (start, end, bearing, length) {
            (Some(s), Some(e), _, _) => Tangent::from_points(s, e)?,
            (Some(s), None, Some(b), Some(l)) => Tangent::new(s, b, l)?,
            (None, Some(e), Some(b), Some(l)) => {
                Tangent::new(e - vector_from_bearing(b) * l, b, l)?
            }
            _ => {
                return Err(GeometryError::Degenerate(
                    "line needs two points, or a point with bearing and length".to_owned(),
                )
                .into());
            }
        };

        Ok(Self { meta, tangent })
    }
}

/// A resolved circular curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveElement {
    pub meta: ElementMeta,
    /// LandXML `crvType`, `arc` unless stated otherwise.
    pub curve_type: Option<String>,
    pub arc: ResolvedArc,
}

/// A transition spiral, kept as parameters only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiralElement {
    pub meta: ElementMeta,
    pub params: SpiralParams,
    pub start: Option<Point3>,
    pub end: Option<Point3>,
    pub pi: Option<Point3>,
}

/// One element of an alignment's coordinate geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryElement {
    Line(LineElement),
    Curve(CurveElement),
    Spiral(SpiralElement),
}

impl GeometryElement {
    #[must_use]
    pub fn meta(&self) -> &ElementMeta {
        match self {
            Self::Line(line) => &line.meta,
            Self::Curve(curve) => &curve.meta,
            Self::Spiral(spiral) => &spiral.meta,
        }
    }

    /// LandXML element name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "Line",
            Self::Curve(_) => "Curve",
            Self::Spiral(_) => "Spiral",
        }
    }

    /// Length along the element.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.tangent.length(),
            Self::Curve(curve) => curve.arc.length(),
            Self::Spiral(spiral) => spiral.params.length,
        }
    }

    /// The element as an evaluable curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Unsupported`] for spirals.
    pub fn as_curve(&self) -> Result<&dyn Curve> {
        match self {
            Self::Line(line) => Ok(&line.tangent),
            Self::Curve(curve) => Ok(&curve.arc),
            Self::Spiral(_) => {
                Err(GeometryError::Unsupported("spiral evaluation".to_owned()).into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn line_from_end_bearing_and_length() {
        let line = LineElement::from_parts(
            ElementMeta::default(),
            None,
            Some(Point3::new(10.0, 0.0, 0.0)),
            Some(FRAC_PI_2),
            Some(4.0),
        )
        .unwrap();
        assert_abs_diff_eq!(*line.tangent.start(), Point3::new(6.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn points_win_over_bearing() {
        let line = LineElement::from_parts(
            ElementMeta::default(),
            Some(Point3::origin()),
            Some(Point3::new(0.0, 5.0, 0.0)),
            Some(1.0),
            Some(1.0),
        )
        .unwrap();
        assert_abs_diff_eq!(line.tangent.bearing(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line.tangent.length(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn unlocated_line_is_degenerate() {
        let result =
            LineElement::from_parts(ElementMeta::default(), None, None, Some(1.0), Some(3.0));
        assert!(result.is_err());
    }

    #[test]
    fn spirals_cannot_be_evaluated() {
        let spiral = GeometryElement::Spiral(SpiralElement::default());
        assert!(spiral.as_curve().is_err());
        assert_eq!(spiral.kind(), "Spiral");
    }
}
