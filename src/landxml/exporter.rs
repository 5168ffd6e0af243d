use std::fmt::Display;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::alignment::{Alignment, ElementMeta, GeometryElement, Project};
use crate::error::{LandXmlError, Result};
use crate::geometry::Curve;
use crate::math::bearing::Rotation;
use crate::math::Point3;
use crate::station::station_to_distance;
use crate::units::UnitConfig;

const NAMESPACE: &str = "http://www.landxml.org/schema/LandXML-1.2";

/// Writes horizontal alignments as LandXML 1.2.
#[derive(Debug, Clone, Default)]
pub struct AlignmentExporter {
    units: UnitConfig,
}

fn write_error(err: impl Display) -> LandXmlError {
    LandXmlError::Write(err.to_string())
}

fn rotation_name(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::Ccw => "ccw",
        Rotation::Cw => "cw",
    }
}

/// An element under construction; `None` values are skipped.
struct Element(BytesStart<'static>);

impl Element {
    fn new(name: &'static str) -> Self {
        Self(BytesStart::new(name))
    }

    fn attr(mut self, key: &str, value: Option<impl Display>) -> Self {
        if let Some(value) = value {
            self.0.push_attribute((key, value.to_string().as_str()));
        }
        self
    }

    fn text(self, key: &str, value: Option<&String>) -> Self {
        self.attr(key, value.filter(|v| !v.is_empty()))
    }
}

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(write_error)?;
        Ok(())
    }

    fn open(&mut self, element: Element) -> Result<()> {
        self.event(Event::Start(element.0))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, element: Element) -> Result<()> {
        self.event(Event::Empty(element.0))
    }

    fn text_element(&mut self, name: &'static str, text: &str) -> Result<()> {
        self.open(Element::new(name))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }
}

impl AlignmentExporter {
    /// Creates an exporter writing in the given document units.
    #[must_use]
    pub fn new(units: UnitConfig) -> Self {
        Self { units }
    }

    /// Writes a project to a LandXML file.
    ///
    /// # Errors
    ///
    /// Returns [`LandXmlError::Io`] if the file cannot be written.
    pub fn export_file(&self, project: &Project, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.export_string(project)?;
        std::fs::write(path, xml).map_err(LandXmlError::from)?;
        Ok(())
    }

    /// Writes a project as a LandXML document.
    ///
    /// # Errors
    ///
    /// Returns [`LandXmlError::Write`] if serialization fails.
    pub fn export_string(&self, project: &Project) -> Result<String> {
        let mut out = XmlOut {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };

        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        out.open(
            Element::new("LandXML")
                .attr("xmlns", Some(NAMESPACE))
                .attr("version", Some("1.2")),
        )?;

        // Step 1: Units.
        let linear = self.units.linear;
        let (system, area, volume) = if linear.is_metric() {
            ("Metric", "squareMeter", "cubicMeter")
        } else {
            ("Imperial", "squareFoot", "cubicYard")
        };
        out.open(Element::new("Units"))?;
        out.empty(
            Element::new(system)
                .attr("linearUnit", Some(linear.landxml_name()))
                .attr("areaUnit", Some(area))
                .attr("volumeUnit", Some(volume))
                .attr("angularUnit", Some("decimal degrees"))
                .attr("directionUnit", Some("decimal degrees")),
        )?;
        out.close("Units")?;

        // Step 2: Project and application.
        out.empty(Element::new("Project").attr("name", Some(&project.name)))?;
        out.empty(
            Element::new("Application")
                .attr("name", Some(env!("CARGO_PKG_NAME")))
                .attr("version", Some(env!("CARGO_PKG_VERSION"))),
        )?;

        // Step 3: Alignments.
        out.open(Element::new("Alignments"))?;
        for alignment in &project.alignments {
            self.write_alignment(&mut out, alignment)?;
        }
        out.close("Alignments")?;
        out.close("LandXML")?;

        let xml = String::from_utf8(out.writer.into_inner()).map_err(write_error)?;
        tracing::info!(
            project = %project.name,
            alignments = project.alignments.len(),
            "LandXML export finished"
        );
        Ok(xml)
    }

    fn length(&self, value: f64) -> f64 {
        self.units.length_to_document(value)
    }

    fn coordinates(&self, point: &Point3) -> String {
        let p = self.units.point_to_document(point);
        format!("{} {} {}", p.x, p.y, p.z)
    }

    fn write_point(
        &self,
        out: &mut XmlOut,
        name: &'static str,
        point: Option<&Point3>,
    ) -> Result<()> {
        match point {
            Some(p) => out.text_element(name, &self.coordinates(p)),
            None => Ok(()),
        }
    }

    fn write_alignment(&self, out: &mut XmlOut, alignment: &Alignment) -> Result<()> {
        let meta = &alignment.meta;
        let length = if meta.length > 0.0 {
            meta.length
        } else {
            alignment.geometry_length()
        };

        out.open(
            Element::new("Alignment")
                .attr("name", Some(&meta.name))
                .attr("length", Some(self.length(length)))
                .attr("staStart", Some(self.length(meta.start_station)))
                .text("desc", meta.description.as_ref())
                .text("oID", meta.object_id.as_ref())
                .text("state", meta.status.as_ref()),
        )?;
        self.write_point(out, "Start", meta.start.as_ref())?;

        out.open(Element::new("CoordGeom"))?;
        for element in &alignment.geometry {
            self.write_element(out, element)?;
        }
        out.close("CoordGeom")?;

        let equations = &alignment.station_equations;
        for (i, eq) in equations.iter().enumerate() {
            let position = eq
                .position
                .or_else(|| station_to_distance(eq.back, meta.start_station, &equations[..i]));
            out.empty(
                Element::new("StaEquation")
                    .attr("staBack", Some(self.length(eq.back)))
                    .attr("staAhead", Some(self.length(eq.ahead)))
                    .attr("staInternal", position.map(|p| self.length(p)))
                    .text("staIncrement", eq.increment.as_ref())
                    .text("desc", eq.description.as_ref()),
            )?;
        }

        out.close("Alignment")
    }

    fn with_meta(&self, element: Element, meta: &ElementMeta) -> Element {
        element
            .text("name", meta.name.as_ref())
            .text("desc", meta.description.as_ref())
            .attr("staStart", meta.start_station.map(|s| self.length(s)))
            .text("state", meta.status.as_ref())
            .text("oID", meta.object_id.as_ref())
            .text("note", meta.note.as_ref())
    }

    fn write_element(&self, out: &mut XmlOut, element: &GeometryElement) -> Result<()> {
        match element {
            GeometryElement::Line(line) => {
                let t = &line.tangent;
                out.open(
                    self.with_meta(Element::new("Line"), &line.meta)
                        .attr("dir", Some(t.bearing().to_degrees()))
                        .attr("length", Some(self.length(t.length()))),
                )?;
                self.write_point(out, "Start", Some(t.start()))?;
                self.write_point(out, "End", Some(&t.end()))?;
                out.close("Line")
            }
            GeometryElement::Curve(curve) => {
                let arc = &curve.arc;
                out.open(
                    self.with_meta(Element::new("Curve"), &curve.meta)
                        .attr("rot", Some(rotation_name(arc.direction)))
                        .text("crvType", curve.curve_type.as_ref())
                        .attr("radius", Some(self.length(arc.radius)))
                        .attr("length", Some(self.length(arc.length)))
                        .attr("delta", Some(arc.delta.to_degrees()))
                        .attr("dirStart", Some(arc.bearing_in.to_degrees()))
                        .attr("dirEnd", Some(arc.bearing_out.to_degrees()))
                        .attr("chord", Some(self.length(arc.chord)))
                        .attr("external", Some(self.length(arc.external)))
                        .attr("midOrd", Some(self.length(arc.middle)))
                        .attr("tangent", Some(self.length(arc.tangent))),
                )?;
                self.write_point(out, "Start", Some(&arc.start))?;
                self.write_point(out, "Center", Some(&arc.center))?;
                self.write_point(out, "End", Some(&arc.end))?;
                self.write_point(out, "PI", Some(&arc.pi))?;
                out.close("Curve")
            }
            GeometryElement::Spiral(spiral) => {
                let p = &spiral.params;
                // LandXML writes a tangent (infinite radius) end as INF
                let radius = |r: Option<f64>| {
                    r.map_or_else(|| "INF".to_owned(), |r| self.length(r).to_string())
                };
                out.open(
                    self.with_meta(Element::new("Spiral"), &spiral.meta)
                        .attr("length", Some(self.length(p.length)))
                        .attr("radiusStart", Some(radius(p.radius_start)))
                        .attr("radiusEnd", Some(radius(p.radius_end)))
                        .attr("rot", p.direction.map(rotation_name))
                        .attr("spiType", Some(&p.spiral_type))
                        .attr("chord", p.chord.map(|c| self.length(c)))
                        .attr("constant", p.constant)
                        .attr("dirStart", p.bearing_in.map(f64::to_degrees))
                        .attr("dirEnd", p.bearing_out.map(f64::to_degrees))
                        .attr("tanLong", p.tangent_long.map(|t| self.length(t)))
                        .attr("tanShort", p.tangent_short.map(|t| self.length(t))),
                )?;
                self.write_point(out, "Start", spiral.start.as_ref())?;
                self.write_point(out, "PI", spiral.pi.as_ref())?;
                self.write_point(out, "End", spiral.end.as_ref())?;
                out.close("Spiral")
            }
        }
    }
}
