use std::path::Path;

use ::csv::{Reader, ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::error::{ArcError, CsvError, GeoalignError, Result};
use crate::geometry::{ArcDescriptor, ResolvedArc};
use crate::math::bearing::Rotation;
use crate::math::Point3;
use crate::operations::ResolveArc;
use crate::station::radius_from_degree_of_curve;
use crate::units::UnitConfig;

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// A curve parameter a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcField {
    Name,
    StartX,
    StartY,
    StartZ,
    EndX,
    EndY,
    EndZ,
    CenterX,
    CenterY,
    CenterZ,
    PiX,
    PiY,
    PiZ,
    Radius,
    Tangent,
    Chord,
    Middle,
    External,
    Length,
    /// Central angle in decimal degrees.
    Delta,
    BearingIn,
    BearingOut,
    /// `cw`/`ccw`, `right`/`left` or `1`/`-1`.
    Direction,
    /// Degree of curve (arc definition, decimal degrees), converted to a
    /// radius with the configured station length.
    DegreeOfCurve,
}

impl ArcField {
    /// Maps a header cell to a field, ignoring case, spaces, `-` and `_`.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let key = header
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-', '_', '.'], "");
        let field = match key.as_str() {
            "name" | "id" | "label" => Self::Name,
            "startx" | "pcx" | "x1" => Self::StartX,
            "starty" | "pcy" | "y1" => Self::StartY,
            "startz" | "pcz" | "z1" => Self::StartZ,
            "endx" | "ptx" | "x2" => Self::EndX,
            "endy" | "pty" | "y2" => Self::EndY,
            "endz" | "ptz" | "z2" => Self::EndZ,
            "centerx" | "centrex" | "ccx" => Self::CenterX,
            "centery" | "centrey" | "ccy" => Self::CenterY,
            "centerz" | "centrez" | "ccz" => Self::CenterZ,
            "pix" => Self::PiX,
            "piy" => Self::PiY,
            "piz" => Self::PiZ,
            "radius" | "r" => Self::Radius,
            "tangent" | "t" => Self::Tangent,
            "chord" | "c" => Self::Chord,
            "middle" | "midord" | "middleordinate" | "m" => Self::Middle,
            "external" | "e" => Self::External,
            "length" | "arclength" | "l" => Self::Length,
            "delta" | "centralangle" | "angle" => Self::Delta,
            "bearingin" | "dirstart" | "bi" => Self::BearingIn,
            "bearingout" | "dirend" | "bo" => Self::BearingOut,
            "direction" | "rot" | "rotation" => Self::Direction,
            "degree" | "degreeofcurve" | "doc" | "d" => Self::DegreeOfCurve,
            _ => return None,
        };
        Some(field)
    }
}

/// How the input is split into columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvOptions {
    /// Field delimiter byte. Sniffed from the first record when `None`.
    pub delimiter: Option<u8>,
    /// Whether the first record is a header. Detected when `None`.
    pub has_header: Option<bool>,
    /// Column map overriding the header; `None` entries are ignored columns.
    pub columns: Option<Vec<Option<ArcField>>>,
}

/// A problem with one row. The row is skipped and the import continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsvRowError {
    #[error("row {row}: invalid value '{value}' for {field:?}")]
    InvalidValue {
        row: usize,
        field: ArcField,
        value: String,
    },

    #[error("row {row}: {reason}")]
    Curve { row: usize, reason: ArcError },

    #[error("row {row}: {reason}")]
    Failed { row: usize, reason: String },
}

/// A curve read from one row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvCurve {
    /// 1-based line number in the input.
    pub row: usize,
    pub name: Option<String>,
    pub arc: ResolvedArc,
}

/// Result of a CSV import: resolved curves plus every rejected row.
#[derive(Debug, Clone, Default)]
pub struct CsvReport {
    pub curves: Vec<CsvCurve>,
    pub errors: Vec<CsvRowError>,
}

/// Reads and resolves curves from delimited text.
///
/// Each data row describes one circular curve in document units. Rows are
/// resolved independently; rows that fail are reported without stopping the
/// import.
#[derive(Debug, Clone, Default)]
pub struct CsvImporter {
    units: UnitConfig,
    options: CsvOptions,
}

impl CsvImporter {
    /// Creates an importer for values in the given units.
    #[must_use]
    pub fn new(units: UnitConfig) -> Self {
        Self {
            units,
            options: CsvOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Reads curves from a file.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`CsvImporter::import_str`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<CsvReport> {
        let text = std::fs::read_to_string(path).map_err(CsvError::from)?;
        self.import_str(&text)
    }

    /// Reads curves from text.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Empty`] if there are no records,
    /// [`CsvError::NoColumns`] if no column maps to a curve parameter, or
    /// [`CsvError::Read`] if the text cannot be split into records.
    pub fn import_str(&self, text: &str) -> Result<CsvReport> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // Step 1: Records, split on the given or sniffed delimiter.
        let delimiter = self
            .options
            .delimiter
            .unwrap_or_else(|| sniff_delimiter(text));
        let mut records = Vec::new();
        for record in reader(text, delimiter).into_records() {
            let record = record.map_err(CsvError::from)?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let row = record
                .position()
                .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));
            records.push((row, record));
        }

        // Step 2: Header and column map.
        let mut records = records.into_iter();
        let (first_row, first) = records.next().ok_or(CsvError::Empty)?;
        let has_header = self
            .options
            .has_header
            .unwrap_or_else(|| looks_like_header(&first));

        let columns = match (&self.options.columns, has_header) {
            (Some(columns), _) => columns.clone(),
            (None, true) => first.iter().map(ArcField::from_header).collect(),
            (None, false) => Vec::new(),
        };
        if columns.iter().all(Option::is_none) {
            return Err(GeoalignError::Csv(CsvError::NoColumns));
        }
        tracing::debug!(delimiter = %char::from(delimiter), has_header, ?columns, "csv layout");

        // Step 3: Rows.
        let rows = (!has_header)
            .then_some((first_row, first))
            .into_iter()
            .chain(records);

        let mut report = CsvReport::default();
        for (row, record) in rows {
            match self.read_row(row, &columns, &record) {
                Ok(curve) => report.curves.push(curve),
                Err(error) => {
                    tracing::warn!(%error, "csv row skipped");
                    report.errors.push(error);
                }
            }
        }

        tracing::info!(
            curves = report.curves.len(),
            errors = report.errors.len(),
            "csv import finished"
        );
        Ok(report)
    }

    fn read_row(
        &self,
        row: usize,
        columns: &[Option<ArcField>],
        record: &StringRecord,
    ) -> std::result::Result<CsvCurve, CsvRowError> {
        let mut fields = RowFields::default();
        for (field, cell) in columns.iter().zip(record) {
            let (Some(field), cell) = (field, cell.trim()) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            fields.set(*field, cell).ok_or_else(|| CsvRowError::InvalidValue {
                row,
                field: *field,
                value: cell.to_owned(),
            })?;
        }

        let (name, mut descriptor) = fields.into_descriptor();
        if descriptor.radius.is_none() {
            descriptor.radius = fields
                .degree
                .map(|d| radius_from_degree_of_curve(d.to_radians(), self.units.station_length()));
        }

        let arc = ResolveArc::new(descriptor.to_internal(&self.units))
            .execute()
            .map_err(|e| match e {
                GeoalignError::Arc(reason) => CsvRowError::Curve { row, reason },
                other => CsvRowError::Failed {
                    row,
                    reason: other.to_string(),
                },
            })?;

        Ok(CsvCurve { row, name, arc })
    }
}

/// Values of one row, in document units.
#[derive(Debug, Default)]
struct RowFields {
    name: Option<String>,
    start: [Option<f64>; 3],
    end: [Option<f64>; 3],
    center: [Option<f64>; 3],
    pi: [Option<f64>; 3],
    arc: ArcDescriptor,
    degree: Option<f64>,
}

impl RowFields {
    /// Stores a cell. Returns `None` if the value cannot be parsed.
    fn set(&mut self, field: ArcField, cell: &str) -> Option<()> {
        if field == ArcField::Name {
            self.name = Some(cell.to_owned());
            return Some(());
        }
        if field == ArcField::Direction {
            self.arc.direction = Some(parse_direction(cell)?);
            return Some(());
        }

        let value = cell.parse::<f64>().ok().filter(|v| v.is_finite())?;
        let slot = match field {
            ArcField::StartX => &mut self.start[0],
            ArcField::StartY => &mut self.start[1],
            ArcField::StartZ => &mut self.start[2],
            ArcField::EndX => &mut self.end[0],
            ArcField::EndY => &mut self.end[1],
            ArcField::EndZ => &mut self.end[2],
            ArcField::CenterX => &mut self.center[0],
            ArcField::CenterY => &mut self.center[1],
            ArcField::CenterZ => &mut self.center[2],
            ArcField::PiX => &mut self.pi[0],
            ArcField::PiY => &mut self.pi[1],
            ArcField::PiZ => &mut self.pi[2],
            ArcField::Radius => &mut self.arc.radius,
            ArcField::Tangent => &mut self.arc.tangent,
            ArcField::Chord => &mut self.arc.chord,
            ArcField::Middle => &mut self.arc.middle,
            ArcField::External => &mut self.arc.external,
            ArcField::Length => &mut self.arc.length,
            ArcField::Delta => &mut self.arc.delta,
            ArcField::BearingIn => &mut self.arc.bearing_in,
            ArcField::BearingOut => &mut self.arc.bearing_out,
            ArcField::DegreeOfCurve => &mut self.degree,
            ArcField::Name | ArcField::Direction => return None,
        };
        *slot = Some(value);
        Some(())
    }

    /// Builds the descriptor. A point needs both x and y; z defaults to 0.
    fn into_descriptor(&mut self) -> (Option<String>, ArcDescriptor) {
        let point = |[x, y, z]: [Option<f64>; 3]| match (x, y) {
            (Some(x), Some(y)) => Some(Point3::new(x, y, z.unwrap_or(0.0))),
            _ => None,
        };

        let mut arc = std::mem::take(&mut self.arc);
        arc.start = point(self.start);
        arc.end = point(self.end);
        arc.center = point(self.center);
        arc.pi = point(self.pi);
        (self.name.take(), arc)
    }
}

fn parse_direction(cell: &str) -> Option<Rotation> {
    match cell.to_ascii_lowercase().as_str() {
        "cw" | "right" | "r" | "1" => Some(Rotation::Cw),
        "ccw" | "left" | "l" | "-1" => Some(Rotation::Ccw),
        _ => None,
    }
}

fn reader(text: &str, delimiter: u8) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

/// Picks the candidate delimiter that splits the first record into the most
/// fields, defaulting to a comma.
fn sniff_delimiter(text: &str) -> u8 {
    DELIMITERS
        .iter()
        .copied()
        .filter_map(|d| match reader(text, d).into_records().next() {
            Some(Ok(record)) if record.len() > 1 => Some((d, record.len())),
            _ => None,
        })
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(d, _)| d)
}

/// A header has no numeric cells.
fn looks_like_header(record: &StringRecord) -> bool {
    record
        .iter()
        .filter(|c| !c.is_empty())
        .all(|c| c.parse::<f64>().is_err())
}
