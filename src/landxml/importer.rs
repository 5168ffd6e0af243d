use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::alignment::{
    Alignment, AlignmentMeta, CurveElement, ElementMeta, GeometryElement, LineElement, Project,
    SpiralElement,
};
use crate::error::{ArcError, GeoalignError, LandXmlError, Result};
use crate::geometry::{ArcDescriptor, SpiralParams};
use crate::math::bearing::{delta_from_bearings, Rotation};
use crate::math::Point3;
use crate::operations::ResolveArc;
use crate::station::StationEquation;
use crate::units::{LinearUnit, UnitConfig};

use super::schema::{self, AttrKind, AttrSpec};
use super::tree::{self, XmlNode};

/// A problem with one alignment or element. The importer skips the
/// offending item and continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("required attribute {attribute} not found on {element} in alignment {alignment}")]
    MissingAttribute {
        alignment: String,
        element: String,
        attribute: &'static str,
    },

    #[error("invalid {attribute} value '{value}' on {element} in alignment {alignment}")]
    InvalidAttribute {
        alignment: String,
        element: String,
        attribute: &'static str,
        value: String,
    },

    #[error("missing {element} {point} coordinate in alignment {alignment}")]
    MissingCoordinate {
        alignment: String,
        element: String,
        point: &'static str,
    },

    #[error("invalid {element} {point} coordinate '{value}' in alignment {alignment}")]
    InvalidCoordinate {
        alignment: String,
        element: String,
        point: &'static str,
        value: String,
    },

    #[error("{element} in alignment {alignment} skipped: {reason}")]
    Curve {
        alignment: String,
        element: String,
        reason: ArcError,
    },

    #[error("{element} in alignment {alignment} skipped: {reason}")]
    Element {
        alignment: String,
        element: String,
        reason: String,
    },

    #[error("missing coordinate geometry for alignment {alignment}")]
    MissingCoordGeom { alignment: String },
}

/// Result of a LandXML import: the project plus every non-fatal problem.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub project: Project,
    pub errors: Vec<ImportError>,
}

/// Reads horizontal alignments from LandXML 1.2.
///
/// Coordinates are read as `x y [z]` in file order. Lengths and stations are
/// scaled to millimeters and angles converted from decimal degrees.
#[derive(Debug, Clone, Default)]
pub struct AlignmentImporter {
    units: UnitConfig,
}

/// A parsed attribute value.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Number(f64),
    Rotation(Option<Rotation>),
}

/// Attributes of one element, read against its table.
#[derive(Debug, Default)]
struct Attributes {
    values: HashMap<&'static str, Value>,
}

impl Attributes {
    fn text(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(Value::Text(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(Value::Number(v)) => Some(*v),
            _ => None,
        }
    }

    fn rotation(&self) -> Option<Rotation> {
        match self.values.get("rot") {
            Some(Value::Rotation(r)) => *r,
            _ => None,
        }
    }
}

/// Collects errors for the alignment being read.
struct Context<'a> {
    alignment: String,
    errors: &'a mut Vec<ImportError>,
}

impl Context<'_> {
    fn push(&mut self, error: ImportError) {
        tracing::warn!(alignment = %self.alignment, %error, "import problem");
        self.errors.push(error);
    }
}

impl AlignmentImporter {
    /// Creates an importer for documents in the given units.
    #[must_use]
    pub fn new(units: UnitConfig) -> Self {
        Self { units }
    }

    /// Imports a LandXML file.
    ///
    /// # Errors
    ///
    /// Returns [`LandXmlError::Io`] if the file cannot be read, otherwise as
    /// [`AlignmentImporter::import_str`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let xml = std::fs::read_to_string(path).map_err(LandXmlError::from)?;
        self.import_str(&xml)
    }

    /// Imports a LandXML document.
    ///
    /// # Errors
    ///
    /// Returns a [`LandXmlError`] for malformed XML, missing or mismatched
    /// units, or a missing `Alignments` element. Problems with individual
    /// alignments and elements are collected in [`ImportReport::errors`].
    pub fn import_str(&self, xml: &str) -> Result<ImportReport> {
        let root = tree::parse(xml)?;

        // Step 1: Units must match the configured document units.
        let units = root.child("Units").ok_or(LandXmlError::MissingUnits)?;
        self.validate_units(units)?;

        // Step 2: Project name.
        let name = root
            .child("Project")
            .and_then(|p| p.attribute("name"))
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown Project")
            .to_owned();

        let alignments = root
            .child("Alignments")
            .ok_or(LandXmlError::MissingElement("Alignments"))?;

        // Step 3: Alignments, each under a unique name.
        let mut report = ImportReport {
            project: Project {
                name,
                units: self.units,
                alignments: Vec::new(),
            },
            errors: Vec::new(),
        };

        for node in alignments.children_named("Alignment") {
            let base = node
                .attribute("name")
                .filter(|n| !n.is_empty())
                .unwrap_or("Unknown Alignment");
            let name = unique_name(base, &report.project.alignments);

            let mut ctx = Context {
                alignment: name.clone(),
                errors: &mut report.errors,
            };
            if let Some(alignment) = self.read_alignment(&mut ctx, name, node) {
                report.project.alignments.push(alignment);
            }
        }

        tracing::info!(
            project = %report.project.name,
            alignments = report.project.alignments.len(),
            errors = report.errors.len(),
            "LandXML import finished"
        );
        Ok(report)
    }

    fn validate_units(&self, units: &XmlNode) -> Result<()> {
        let linear = units
            .children
            .iter()
            .find(|c| c.name == "Metric" || c.name == "Imperial")
            .and_then(|c| c.attribute("linearUnit"))
            .ok_or(LandXmlError::MissingUnits)?;
        let found: LinearUnit = linear.parse().map_err(LandXmlError::from)?;

        if found != self.units.linear {
            return Err(LandXmlError::UnitMismatch {
                expected: self.units.linear.to_string(),
                found: found.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn read_alignment(
        &self,
        ctx: &mut Context<'_>,
        name: String,
        node: &XmlNode,
    ) -> Option<Alignment> {
        let element = format!("Alignment {name}");
        let attrs = self.read_attributes(ctx, &element, node, schema::ALIGNMENT)?;

        let mut alignment = Alignment::new(AlignmentMeta {
            name,
            description: attrs.text("desc"),
            object_id: attrs.text("oID"),
            status: attrs.text("state"),
            length: attrs.number("length").unwrap_or(0.0),
            start_station: attrs.number("staStart").unwrap_or(0.0),
            start: self.read_point(ctx, &element, node, "Start", false),
        });

        for (i, eq) in node.children_named("StaEquation").enumerate() {
            let element = format!("StaEquation {}", i + 1);
            let Some(attrs) = self.read_attributes(ctx, &element, eq, schema::STA_EQUATION) else {
                continue;
            };
            alignment.station_equations.push(StationEquation {
                back: attrs.number("staBack").unwrap_or(0.0),
                ahead: attrs.number("staAhead").unwrap_or(0.0),
                position: attrs.number("staInternal"),
                increment: attrs.text("staIncrement"),
                description: attrs.text("desc"),
            });
        }

        let Some(coord_geom) = node.child("CoordGeom") else {
            ctx.push(ImportError::MissingCoordGeom {
                alignment: ctx.alignment.clone(),
            });
            return Some(alignment);
        };

        for (i, child) in coord_geom.children.iter().enumerate() {
            let element = format!("{} {}", child.name, i + 1);
            let geometry = match child.name.as_str() {
                "Line" => self.read_line(ctx, &element, child),
                "Curve" => self.read_curve(ctx, &element, child),
                "Spiral" => self.read_spiral(ctx, &element, child),
                _ => continue,
            };
            if let Some(geometry) = geometry {
                alignment.geometry.push(geometry);
            }
        }

        tracing::debug!(
            alignment = %alignment.meta.name,
            elements = alignment.geometry.len(),
            equations = alignment.station_equations.len(),
            "alignment imported"
        );
        Some(alignment)
    }

    fn read_line(
        &self,
        ctx: &mut Context<'_>,
        element: &str,
        node: &XmlNode,
    ) -> Option<GeometryElement> {
        let attrs = self.read_attributes(ctx, element, node, schema::LINE)?;
        let start = self.read_point(ctx, element, node, "Start", true);
        let end = self.read_point(ctx, element, node, "End", true);

        match LineElement::from_parts(
            element_meta(&attrs),
            start,
            end,
            attrs.number("dir"),
            attrs.number("length"),
        ) {
            Ok(line) => Some(GeometryElement::Line(line)),
            Err(err) => {
                ctx.push(ImportError::Element {
                    alignment: ctx.alignment.clone(),
                    element: element.to_owned(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    fn read_curve(
        &self,
        ctx: &mut Context<'_>,
        element: &str,
        node: &XmlNode,
    ) -> Option<GeometryElement> {
        let attrs = self.read_attributes(ctx, element, node, schema::CURVE)?;

        let mut arc = ArcDescriptor {
            start: self.read_point(ctx, element, node, "Start", true),
            end: self.read_point(ctx, element, node, "End", true),
            center: self.read_point(ctx, element, node, "Center", false),
            pi: self.read_point(ctx, element, node, "PI", false),
            radius: attrs.number("radius"),
            tangent: attrs.number("tangent"),
            chord: attrs.number("chord"),
            middle: attrs.number("midOrd"),
            external: attrs.number("external"),
            length: attrs.number("length"),
            delta: attrs.number("delta"),
            bearing_in: attrs.number("dirStart"),
            bearing_out: attrs.number("dirEnd"),
            direction: attrs.rotation(),
        };

        // A bearing pair stands in for a missing delta or rotation.
        if let (Some(b_in), Some(b_out)) = (arc.bearing_in, arc.bearing_out) {
            let (rotation, delta) = delta_from_bearings(b_in, b_out);
            arc.direction = arc.direction.or(Some(rotation));
            arc.delta = arc.delta.filter(|d| *d > 0.0).or(Some(delta));
        }

        match ResolveArc::new(arc).execute() {
            Ok(resolved) => Some(GeometryElement::Curve(CurveElement {
                meta: element_meta(&attrs),
                curve_type: attrs.text("crvType"),
                arc: resolved,
            })),
            Err(GeoalignError::Arc(reason)) => {
                ctx.push(ImportError::Curve {
                    alignment: ctx.alignment.clone(),
                    element: element.to_owned(),
                    reason,
                });
                None
            }
            Err(err) => {
                ctx.push(ImportError::Element {
                    alignment: ctx.alignment.clone(),
                    element: element.to_owned(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    fn read_spiral(
        &self,
        ctx: &mut Context<'_>,
        element: &str,
        node: &XmlNode,
    ) -> Option<GeometryElement> {
        let attrs = self.read_attributes(ctx, element, node, schema::SPIRAL)?;
        let finite = |key| attrs.number(key).filter(|v: &f64| v.is_finite());

        let params = SpiralParams {
            length: finite("length").unwrap_or(0.0),
            radius_start: finite("radiusStart"),
            radius_end: finite("radiusEnd"),
            direction: attrs.rotation(),
            spiral_type: attrs
                .text("spiType")
                .and_then(|t| t.parse().ok())
                .unwrap_or_default(),
            chord: finite("chord"),
            constant: finite("constant"),
            bearing_in: finite("dirStart"),
            bearing_out: finite("dirEnd"),
            tangent_long: finite("tanLong"),
            tangent_short: finite("tanShort"),
        };

        Some(GeometryElement::Spiral(SpiralElement {
            meta: element_meta(&attrs),
            params,
            start: self.read_point(ctx, element, node, "Start", true),
            end: self.read_point(ctx, element, node, "End", true),
            pi: self.read_point(ctx, element, node, "PI", false),
        }))
    }

    /// Reads `table` from `node`. Returns `None` if a required attribute is
    /// missing or invalid.
    fn read_attributes(
        &self,
        ctx: &mut Context<'_>,
        element: &str,
        node: &XmlNode,
        table: &[AttrSpec],
    ) -> Option<Attributes> {
        let mut attrs = Attributes::default();
        let mut complete = true;

        for spec in table {
            let Some(raw) = node.attribute(spec.xml).map(str::trim) else {
                if spec.required {
                    ctx.push(ImportError::MissingAttribute {
                        alignment: ctx.alignment.clone(),
                        element: element.to_owned(),
                        attribute: spec.xml,
                    });
                    complete = false;
                }
                continue;
            };

            match self.convert(spec.kind, raw) {
                Some(value) => {
                    attrs.values.insert(spec.xml, value);
                }
                None => {
                    ctx.push(ImportError::InvalidAttribute {
                        alignment: ctx.alignment.clone(),
                        element: element.to_owned(),
                        attribute: spec.xml,
                        value: raw.to_owned(),
                    });
                    complete &= !spec.required;
                }
            }
        }

        complete.then_some(attrs)
    }

    fn convert(&self, kind: AttrKind, raw: &str) -> Option<Value> {
        let number = || raw.parse::<f64>().ok().filter(|v| !v.is_nan());
        match kind {
            AttrKind::Text => Some(Value::Text(raw.to_owned())),
            AttrKind::Float => number().map(Value::Number),
            AttrKind::Length => number().map(|v| Value::Number(self.units.length_to_internal(v))),
            AttrKind::Angle => number()
                .filter(|v| v.is_finite())
                .map(|v| Value::Number(v.to_radians())),
            AttrKind::Rotation => match raw {
                "cw" => Some(Value::Rotation(Some(Rotation::Cw))),
                "ccw" => Some(Value::Rotation(Some(Rotation::Ccw))),
                "" => Some(Value::Rotation(None)),
                _ => None,
            },
        }
    }

    /// Reads a coordinate child, reporting it when `expected` and missing.
    fn read_point(
        &self,
        ctx: &mut Context<'_>,
        element: &str,
        node: &XmlNode,
        point: &'static str,
        expected: bool,
    ) -> Option<Point3> {
        let Some(child) = node.child(point) else {
            if expected {
                ctx.push(ImportError::MissingCoordinate {
                    alignment: ctx.alignment.clone(),
                    element: element.to_owned(),
                    point,
                });
            }
            return None;
        };

        match parse_coordinates(&child.text) {
            Some(p) => Some(self.units.point_to_internal(&p)),
            None => {
                ctx.push(ImportError::InvalidCoordinate {
                    alignment: ctx.alignment.clone(),
                    element: element.to_owned(),
                    point,
                    value: child.text.trim().to_owned(),
                });
                None
            }
        }
    }
}

fn element_meta(attrs: &Attributes) -> ElementMeta {
    ElementMeta {
        name: attrs.text("name"),
        description: attrs.text("desc"),
        object_id: attrs.text("oID"),
        status: attrs.text("state"),
        note: attrs.text("note"),
        start_station: attrs.number("staStart"),
    }
}

/// Parses `x y [z]`, whitespace separated.
fn parse_coordinates(text: &str) -> Option<Point3> {
    let values = text
        .split_whitespace()
        .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match *values.as_slice() {
        [x, y] => Some(Point3::new(x, y, 0.0)),
        [x, y, z] => Some(Point3::new(x, y, z)),
        _ => None,
    }
}

/// `base`, or `base N` with the smallest `N` not already taken.
fn unique_name(base: &str, existing: &[Alignment]) -> String {
    let taken = |name: &str| existing.iter().any(|a| a.meta.name == name);
    if !taken(base) {
        return base.to_owned();
    }
    (1..)
        .map(|n| format!("{base} {n}"))
        .find(|name| !taken(name))
        .unwrap_or_else(|| base.to_owned())
}
