use thiserror::Error;

/// Top-level error type for the Geoalign crate.
#[derive(Debug, Error)]
pub enum GeoalignError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Arc(#[from] ArcError),

    #[error(transparent)]
    Units(#[from] UnitError),

    #[error(transparent)]
    LandXml(#[from] LandXmlError),

    #[error(transparent)]
    Csv(#[from] CsvError),
}

/// Errors related to geometric evaluation of alignment elements.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("unsupported geometry: {0}")]
    Unsupported(String),
}

/// The stage of curve resolution that produced an [`ArcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Matrix,
    Lengths,
    Delta,
    Direction,
    Bearings,
    Parameters,
    Coordinates,
    Discretization,
}

/// Curve resolution failures, one per resolver stage.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArcError {
    #[error("invalid curve definition: malformed vector matrix")]
    MalformedMatrix,

    #[error("invalid curve definition: cannot determine radius / tangent lengths ({0})")]
    RadiusTangent(String),

    #[error("invalid curve definition: cannot determine central angle")]
    CentralAngle,

    #[error("invalid curve definition: cannot determine curve direction")]
    Direction,

    #[error("invalid curve definition: cannot determine curve bearings ({0})")]
    Bearings(String),

    #[error("invalid curve definition: cannot calculate all parameters")]
    Parameters,

    #[error("invalid curve definition: cannot calculate coordinates")]
    Coordinates,

    #[error("invalid subdivision: {0}")]
    InvalidSubdivision(String),
}

impl ArcError {
    /// Returns the resolver stage that failed.
    #[must_use]
    pub fn stage(&self) -> ResolveStage {
        match self {
            Self::MalformedMatrix => ResolveStage::Matrix,
            Self::RadiusTangent(_) => ResolveStage::Lengths,
            Self::CentralAngle => ResolveStage::Delta,
            Self::Direction => ResolveStage::Direction,
            Self::Bearings(_) => ResolveStage::Bearings,
            Self::Parameters => ResolveStage::Parameters,
            Self::Coordinates => ResolveStage::Coordinates,
            Self::InvalidSubdivision(_) => ResolveStage::Discretization,
        }
    }
}

/// Errors related to unit handling.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("unknown linear unit: {0}")]
    UnknownUnit(String),
}

/// Fatal LandXML errors. Per-element problems are reported through
/// [`crate::landxml::ImportError`] instead.
#[derive(Debug, Error)]
pub enum LandXmlError {
    #[error("malformed XML: {0}")]
    Parse(String),

    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("missing project units")]
    MissingUnits,

    #[error(transparent)]
    InvalidUnits(#[from] UnitError),

    #[error("document units of {expected} expected, units of {found} found")]
    UnitMismatch { expected: String, found: String },

    #[error("missing {0} element")]
    MissingElement(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fatal CSV errors. Per-row problems are collected, not raised.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("empty input")]
    Empty,

    #[error("no column maps to a curve parameter")]
    NoColumns,

    #[error(transparent)]
    Read(#[from] ::csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`GeoalignError`].
pub type Result<T> = std::result::Result<T, GeoalignError>;
