use std::fmt;
use std::str::FromStr;

use crate::error::UnitError;
use crate::geometry::{ArcDescriptor, ResolvedArc};
use crate::math::Point3;

/// Linear unit of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinearUnit {
    Millimeter,
    Centimeter,
    Decimeter,
    #[default]
    Meter,
    Kilometer,
    Foot,
    /// 1200/3937 m.
    UsSurveyFoot,
    /// 12/39.370432 m.
    ClarkeFoot,
    Inch,
    Mile,
}

impl LinearUnit {
    /// Millimeters per unit.
    #[must_use]
    pub fn millimeters(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Decimeter => 100.0,
            Self::Meter => 1000.0,
            Self::Kilometer => 1_000_000.0,
            Self::Foot => 304.8,
            Self::UsSurveyFoot => 12_000.0 / 39.37,
            Self::ClarkeFoot => 12_000.0 / 39.370_432,
            Self::Inch => 25.4,
            Self::Mile => 1_609_344.0,
        }
    }

    #[must_use]
    pub fn is_metric(self) -> bool {
        matches!(
            self,
            Self::Millimeter | Self::Centimeter | Self::Decimeter | Self::Meter | Self::Kilometer
        )
    }

    /// Name used by the LandXML `linearUnit` attribute.
    #[must_use]
    pub fn landxml_name(self) -> &'static str {
        match self {
            Self::Millimeter => "millimeter",
            Self::Centimeter => "centimeter",
            Self::Decimeter => "decimeter",
            Self::Meter => "meter",
            Self::Kilometer => "kilometer",
            Self::Foot => "foot",
            Self::UsSurveyFoot => "USSurveyFoot",
            Self::ClarkeFoot => "ClarkeFoot",
            Self::Inch => "inch",
            Self::Mile => "mile",
        }
    }
}

impl fmt::Display for LinearUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.landxml_name())
    }
}

impl FromStr for LinearUnit {
    type Err = UnitError;

    /// Parses LandXML unit names, common abbreviations, plurals and
    /// international spellings, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        let unit = match name.as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Self::Millimeter,
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Self::Centimeter,
            "dm" | "decimeter" | "decimeters" | "decimetre" | "decimetres" => Self::Decimeter,
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meter,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometer,
            "ft" | "foot" | "feet" | "internationalfoot" => Self::Foot,
            "usft" | "ussurveyfoot" | "surveyfoot" | "usfoot" => Self::UsSurveyFoot,
            "clarkeft" | "clarkefoot" => Self::ClarkeFoot,
            "in" | "inch" | "inches" => Self::Inch,
            "mi" | "mile" | "miles" => Self::Mile,
            _ => return Err(UnitError::UnknownUnit(s.to_owned())),
        };
        Ok(unit)
    }
}

/// Unit configuration of a document.
///
/// Internally every length is in millimeters and every angle in radians.
/// Documents carry lengths in their declared linear unit and angles in
/// decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitConfig {
    pub linear: LinearUnit,
    /// Station length for degree-of-curve conversions, in document units.
    /// `None` uses 100 for imperial and 1000 for metric units.
    pub station_length: Option<f64>,
}

impl UnitConfig {
    #[must_use]
    pub fn new(linear: LinearUnit) -> Self {
        Self {
            linear,
            station_length: None,
        }
    }

    /// Millimeters per document unit.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.linear.millimeters()
    }

    /// Station length in document units.
    #[must_use]
    pub fn station_length(&self) -> f64 {
        self.station_length.unwrap_or(if self.linear.is_metric() {
            1000.0
        } else {
            100.0
        })
    }

    /// Converts a document length to millimeters.
    #[must_use]
    pub fn length_to_internal(&self, value: f64) -> f64 {
        value * self.scale_factor()
    }

    /// Converts millimeters to a document length.
    #[must_use]
    pub fn length_to_document(&self, value: f64) -> f64 {
        value / self.scale_factor()
    }

    #[must_use]
    pub fn point_to_internal(&self, point: &Point3) -> Point3 {
        point * self.scale_factor()
    }

    #[must_use]
    pub fn point_to_document(&self, point: &Point3) -> Point3 {
        point / self.scale_factor()
    }
}

impl ArcDescriptor {
    /// Converts from document units (degrees, document lengths) to internal
    /// units. Direction and absent fields pass through.
    #[must_use]
    pub fn to_internal(&self, units: &UnitConfig) -> Self {
        self.convert(
            |v| units.length_to_internal(v),
            |p| units.point_to_internal(p),
            f64::to_radians,
        )
    }

    /// Converts from internal units to document units.
    #[must_use]
    pub fn to_document(&self, units: &UnitConfig) -> Self {
        self.convert(
            |v| units.length_to_document(v),
            |p| units.point_to_document(p),
            f64::to_degrees,
        )
    }

    fn convert(
        &self,
        length: impl Fn(f64) -> f64,
        point: impl Fn(&Point3) -> Point3,
        angle: impl Fn(f64) -> f64,
    ) -> Self {
        let Self {
            start,
            end,
            center,
            pi,
            radius,
            tangent,
            chord,
            middle,
            external,
            length: arc_length,
            delta,
            bearing_in,
            bearing_out,
            direction,
        } = self;

        Self {
            start: start.as_ref().map(&point),
            end: end.as_ref().map(&point),
            center: center.as_ref().map(&point),
            pi: pi.as_ref().map(&point),
            radius: radius.map(&length),
            tangent: tangent.map(&length),
            chord: chord.map(&length),
            middle: middle.map(&length),
            external: external.map(&length),
            length: arc_length.map(&length),
            delta: delta.map(&angle),
            bearing_in: bearing_in.map(&angle),
            bearing_out: bearing_out.map(&angle),
            direction: *direction,
        }
    }
}

impl ResolvedArc {
    /// Converts a resolved arc into a fully populated descriptor in document
    /// units.
    #[must_use]
    pub fn to_document(&self, units: &UnitConfig) -> ArcDescriptor {
        self.descriptor().to_document(units)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::bearing::Rotation;
    use approx::assert_relative_eq;

    #[test]
    fn parses_landxml_and_abbreviated_names() {
        assert_eq!("USSurveyFoot".parse::<LinearUnit>().unwrap(), LinearUnit::UsSurveyFoot);
        assert_eq!("metres".parse::<LinearUnit>().unwrap(), LinearUnit::Meter);
        assert_eq!(" FT ".parse::<LinearUnit>().unwrap(), LinearUnit::Foot);
        assert!("furlong".parse::<LinearUnit>().is_err());

        for unit in [LinearUnit::ClarkeFoot, LinearUnit::Kilometer, LinearUnit::Inch] {
            assert_eq!(unit.landxml_name().parse::<LinearUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn survey_feet_differ_from_international_feet() {
        assert_relative_eq!(LinearUnit::UsSurveyFoot.millimeters(), 304.800_609_6, epsilon = 1e-6);
        assert!(LinearUnit::ClarkeFoot.millimeters() < LinearUnit::Foot.millimeters());
        assert!(!LinearUnit::Foot.is_metric());
        assert!(LinearUnit::Decimeter.is_metric());
    }

    #[test]
    fn default_station_length_follows_unit_system() {
        assert_eq!(UnitConfig::default().station_length(), 1000.0);
        assert_eq!(UnitConfig::new(LinearUnit::Foot).station_length(), 100.0);
        let custom = UnitConfig {
            station_length: Some(20.0),
            ..UnitConfig::new(LinearUnit::Meter)
        };
        assert_eq!(custom.station_length(), 20.0);
    }

    #[test]
    fn document_conversion_round_trips() {
        let units = UnitConfig::new(LinearUnit::Foot);
        let doc = ArcDescriptor {
            start: Some(Point3::new(400.44, -467.19, 0.0)),
            radius: Some(670.0),
            external: Some(71.3),
            delta: Some(50.3161),
            bearing_in: Some(139.3986),
            direction: Some(Rotation::Ccw),
            ..ArcDescriptor::default()
        };

        let internal = doc.to_internal(&units);
        assert_relative_eq!(internal.radius.unwrap(), 670.0 * 304.8, epsilon = 1e-9);
        assert_relative_eq!(internal.delta.unwrap(), 50.3161f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(internal.start.unwrap().x, 400.44 * 304.8, epsilon = 1e-9);
        assert_eq!(internal.tangent, None);

        let back = internal.to_document(&units);
        assert_eq!(back.direction, Some(Rotation::Ccw));
        assert_eq!(back.pi, None);
        assert_relative_eq!(back.radius.unwrap(), 670.0, epsilon = 1e-9);
        assert_relative_eq!(back.external.unwrap(), 71.3, epsilon = 1e-9);
        assert_relative_eq!(back.bearing_in.unwrap(), 139.3986, epsilon = 1e-9);
        assert_relative_eq!(back.start.unwrap(), doc.start.unwrap(), epsilon = 1e-9);
    }
}
