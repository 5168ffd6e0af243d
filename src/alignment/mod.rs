mod element;

pub use element::{CurveElement, ElementMeta, GeometryElement, LineElement, SpiralElement};

use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::station::{station_to_distance, StationEquation};
use crate::units::UnitConfig;

/// A set of alignments sharing document units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub units: UnitConfig,
    pub alignments: Vec<Alignment>,
}

/// Alignment-level attributes. Lengths and stations are in millimeters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentMeta {
    pub name: String,
    pub description: Option<String>,
    pub object_id: Option<String>,
    pub status: Option<String>,
    pub length: f64,
    pub start_station: f64,
    pub start: Option<Point3>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub meta: AlignmentMeta,
    pub station_equations: Vec<StationEquation>,
    pub geometry: Vec<GeometryElement>,
}

impl Alignment {
    #[must_use]
    pub fn new(meta: AlignmentMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    /// Sum of the element lengths.
    #[must_use]
    pub fn geometry_length(&self) -> f64 {
        self.geometry.iter().map(GeometryElement::length).sum()
    }

    /// Start station of each element: its own start station when given,
    /// otherwise the previous element's start station plus its length.
    #[must_use]
    pub fn element_stations(&self) -> Vec<f64> {
        let mut next = self.meta.start_station;
        self.geometry
            .iter()
            .map(|element| {
                let station = element.meta().start_station.unwrap_or(next);
                next = station + element.length();
                station
            })
            .collect()
    }

    /// Distance along the alignment to the start of each element. An element
    /// with its own start station starts where that station falls.
    fn element_offsets(&self) -> Vec<f64> {
        let mut next = 0.0;
        self.geometry
            .iter()
            .map(|element| {
                let offset = element
                    .meta()
                    .start_station
                    .and_then(|s| {
                        station_to_distance(s, self.meta.start_station, &self.station_equations)
                    })
                    .unwrap_or(next);
                next = offset + element.length();
                offset
            })
            .collect()
    }

    /// Evaluates the alignment at a station, honoring station equations and
    /// explicit element start stations.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if the station is not on
    /// the alignment, or [`GeometryError::Unsupported`] if it falls on a
    /// spiral.
    pub fn point_at_station(&self, station: f64) -> Result<Point3> {
        let offsets = self.element_offsets();
        let end = self
            .geometry
            .iter()
            .zip(&offsets)
            .map(|(element, offset)| offset + element.length())
            .fold(0.0, f64::max);
        let out_of_range = || GeometryError::ParameterOutOfRange {
            parameter: "station",
            value: station,
            min: self.meta.start_station,
            max: self.meta.start_station + end,
        };

        let distance = station_to_distance(station, self.meta.start_station, &self.station_equations)
            .filter(|d| *d <= end + TOLERANCE)
            .ok_or_else(out_of_range)?;

        // Step 1: Find the element containing the distance.
        for (element, &offset) in self.geometry.iter().zip(&offsets) {
            let length = element.length();
            if distance >= offset - TOLERANCE && distance <= offset + length + TOLERANCE {
                // Step 2: Evaluate it locally.
                let local = (distance - offset).clamp(0.0, length);
                return element.as_curve()?.point_at(local);
            }
        }

        Err(out_of_range().into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeoalignError;
    use crate::geometry::{ArcDescriptor, SpiralParams};
    use crate::math::bearing::Rotation;
    use crate::operations::ResolveArc;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    /// North 100, quarter right turn of radius 50, east 100.
    fn sample() -> Alignment {
        let line = |start: Point3, end: Point3| {
            GeometryElement::Line(
                LineElement::from_parts(ElementMeta::default(), Some(start), Some(end), None, None)
                    .unwrap(),
            )
        };
        let arc = ResolveArc::new(ArcDescriptor {
            start: Some(Point3::new(0.0, 100.0, 0.0)),
            radius: Some(50.0),
            delta: Some(FRAC_PI_2),
            bearing_in: Some(0.0),
            direction: Some(Rotation::Cw),
            ..ArcDescriptor::default()
        })
        .execute()
        .unwrap();

        let mut alignment = Alignment::new(AlignmentMeta {
            name: "Main".to_owned(),
            start_station: 1000.0,
            ..AlignmentMeta::default()
        });
        alignment.geometry = vec![
            line(Point3::origin(), Point3::new(0.0, 100.0, 0.0)),
            GeometryElement::Curve(CurveElement {
                meta: ElementMeta::default(),
                curve_type: None,
                arc,
            }),
            line(Point3::new(50.0, 150.0, 0.0), Point3::new(150.0, 150.0, 0.0)),
        ];
        alignment
    }

    #[test]
    fn stations_accumulate_element_lengths() {
        let stations = sample().element_stations();
        assert_eq!(stations.len(), 3);
        assert_abs_diff_eq!(stations[0], 1000.0);
        assert_abs_diff_eq!(stations[1], 1100.0);
        assert_abs_diff_eq!(stations[2], 1100.0 + 25.0 * std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn evaluates_each_element() {
        let alignment = sample();
        let p = alignment.point_at_station(1050.0).unwrap();
        assert_abs_diff_eq!(p, Point3::new(0.0, 50.0, 0.0), epsilon = 1e-9);

        let arc_end = 1100.0 + 25.0 * std::f64::consts::PI;
        let p = alignment.point_at_station(arc_end).unwrap();
        assert_abs_diff_eq!(p, Point3::new(50.0, 150.0, 0.0), epsilon = 1e-6);

        let p = alignment.point_at_station(arc_end + 100.0).unwrap();
        assert_abs_diff_eq!(p, Point3::new(150.0, 150.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn station_equations_shift_stations() {
        let mut alignment = sample();
        alignment.station_equations.push(StationEquation {
            back: 1050.0,
            ahead: 2000.0,
            ..StationEquation::default()
        });
        let p = alignment.point_at_station(2025.0).unwrap();
        assert_abs_diff_eq!(p, Point3::new(0.0, 75.0, 0.0), epsilon = 1e-9);
        assert!(alignment.point_at_station(1060.0).is_err());
    }

    #[test]
    fn explicit_element_stations_place_elements() {
        let mut alignment = sample();
        let shifted = 1200.0;
        let GeometryElement::Line(line) = &mut alignment.geometry[2] else {
            panic!("expected a line");
        };
        line.meta.start_station = Some(shifted);

        assert_abs_diff_eq!(alignment.element_stations()[2], shifted);
        let p = alignment.point_at_station(shifted + 50.0).unwrap();
        assert_abs_diff_eq!(p, Point3::new(100.0, 150.0, 0.0), epsilon = 1e-9);
        assert!(alignment.point_at_station(shifted + 150.0).is_err());
    }

    #[test]
    fn off_alignment_station_is_out_of_range() {
        let err = sample().point_at_station(5000.0).unwrap_err();
        assert!(matches!(
            err,
            GeoalignError::Geometry(GeometryError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn spiral_station_is_unsupported() {
        let mut alignment = sample();
        alignment.geometry.insert(
            0,
            GeometryElement::Spiral(SpiralElement {
                params: SpiralParams {
                    length: 10.0,
                    ..SpiralParams::default()
                },
                ..SpiralElement::default()
            }),
        );
        let err = alignment.point_at_station(1005.0).unwrap_err();
        assert!(matches!(
            err,
            GeoalignError::Geometry(GeometryError::Unsupported(_))
        ));
    }
}
