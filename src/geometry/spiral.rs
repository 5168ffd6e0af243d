use std::fmt;
use std::str::FromStr;

use crate::math::bearing::Rotation;

/// Transition spiral family as named by LandXML `spiType`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpiralType {
    #[default]
    Clothoid,
    Cubic,
    Bloss,
    Sinusoid,
    /// Any other `spiType` value, kept verbatim.
    Other(String),
}

impl FromStr for SpiralType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "clothoid" => Self::Clothoid,
            "cubic" => Self::Cubic,
            "bloss" => Self::Bloss,
            "sinusoid" => Self::Sinusoid,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl fmt::Display for SpiralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clothoid => f.write_str("clothoid"),
            Self::Cubic => f.write_str("cubic"),
            Self::Bloss => f.write_str("bloss"),
            Self::Sinusoid => f.write_str("sinusoid"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Parameters of a transition spiral.
///
/// Spirals are carried through import and export but never solved. An
/// infinite radius (tangent end) is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiralParams {
    pub length: f64,
    pub radius_start: Option<f64>,
    pub radius_end: Option<f64>,
    pub direction: Option<Rotation>,
    pub spiral_type: SpiralType,
    pub chord: Option<f64>,
    pub constant: Option<f64>,
    pub bearing_in: Option<f64>,
    pub bearing_out: Option<f64>,
    pub tangent_long: Option<f64>,
    pub tangent_short: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_type_roundtrips_unknown_names() {
        let t: SpiralType = "biquadratic".parse().unwrap_or_default();
        assert_eq!(t, SpiralType::Other("biquadratic".into()));
        assert_eq!(t.to_string(), "biquadratic");
        assert_eq!("clothoid".parse::<SpiralType>().ok(), Some(SpiralType::Clothoid));
    }
}
