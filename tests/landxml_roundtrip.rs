#![allow(clippy::unwrap_used)]

use approx::assert_abs_diff_eq;
use geoalign::alignment::GeometryElement;
use geoalign::geometry::Curve;
use geoalign::landxml::{AlignmentExporter, AlignmentImporter};
use geoalign::math::bearing::Rotation;
use geoalign::tessellation::{Subdivision, TessellateArc, TessellationParams};
use geoalign::units::{LinearUnit, UnitConfig};
use tracing_subscriber::EnvFilter;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LandXML xmlns="http://www.landxml.org/schema/LandXML-1.2" version="1.2">
  <Units><Imperial linearUnit="USSurveyFoot" angularUnit="decimal degrees"/></Units>
  <Project name="Route 9"/>
  <Alignments>
    <Alignment name="Main" length="688.2358" staStart="1000" desc="mainline">
      <CoordGeom>
        <Line name="T1">
          <Start>335.367115313412 -391.260178508530</Start>
          <End>400.446392270362 -467.185719077963</End>
        </Line>
        <Curve name="C1" rot="ccw" radius="670">
          <Start>400.446392270362 -467.185719077963</Start>
          <Center>909.147514085563 -31.154563466400</Center>
        </Curve>
      </CoordGeom>
      <StaEquation staBack="1050" staAhead="2000" staInternal="50" staIncrement="increasing"/>
    </Alignment>
    <Alignment length="10" staStart="0">
      <CoordGeom/>
    </Alignment>
  </Alignments>
</LandXML>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn import_export_import_preserves_alignments() {
    init_tracing();
    let units = UnitConfig::new(LinearUnit::UsSurveyFoot);

    // Step 1: Import. The curve has no end point and no central angle, so it
    // is rejected while the rest of the alignment survives.
    let first = AlignmentImporter::new(units).import_str(DOCUMENT).unwrap();
    assert_eq!(first.project.name, "Route 9");
    assert_eq!(first.project.alignments.len(), 2);
    assert_eq!(first.project.alignments[1].meta.name, "Unknown Alignment");
    assert_eq!(first.errors.len(), 2, "{:?}", first.errors);

    let main = &first.project.alignments[0];
    assert_eq!(main.meta.name, "Main");
    assert_eq!(main.meta.description.as_deref(), Some("mainline"));
    assert_eq!(main.geometry.len(), 1);
    assert_eq!(main.station_equations.len(), 1);

    // Step 2: Export and read back.
    let xml = AlignmentExporter::new(units)
        .export_string(&first.project)
        .unwrap();
    assert!(xml.contains(r#"linearUnit="USSurveyFoot""#));

    let second = AlignmentImporter::new(units).import_str(&xml).unwrap();
    assert!(second.errors.is_empty(), "{:?}", second.errors);
    assert_eq!(second.project.name, first.project.name);
    assert_eq!(second.project.alignments.len(), 2);

    let again = &second.project.alignments[0];
    assert_eq!(again.meta.name, main.meta.name);
    assert_abs_diff_eq!(again.meta.start_station, main.meta.start_station, epsilon = 1e-6);
    assert_abs_diff_eq!(
        again.station_equations[0].ahead,
        main.station_equations[0].ahead,
        epsilon = 1e-6
    );

    let (GeometryElement::Line(a), GeometryElement::Line(b)) = (&main.geometry[0], &again.geometry[0])
    else {
        panic!("expected lines");
    };
    assert_eq!(b.meta.name.as_deref(), Some("T1"));
    assert_abs_diff_eq!(*a.tangent.start(), *b.tangent.start(), epsilon = 1e-6);
    assert_abs_diff_eq!(a.tangent.length(), b.tangent.length(), epsilon = 1e-6);
}

#[test]
fn resolved_curves_survive_a_round_trip() {
    init_tracing();
    let units = UnitConfig::new(LinearUnit::Foot);
    let document = DOCUMENT
        .replace("USSurveyFoot", "foot")
        .replace(
            r#"<Center>909.147514085563 -31.154563466400</Center>"#,
            r#"<Center>909.147514085563 -31.154563466400</Center>
          <End>919.876030799305 -701.068661638041</End>"#,
        );

    let first = AlignmentImporter::new(units).import_str(&document).unwrap();
    let xml = AlignmentExporter::new(units)
        .export_string(&first.project)
        .unwrap();
    let second = AlignmentImporter::new(units).import_str(&xml).unwrap();
    assert!(second.errors.is_empty(), "{:?}", second.errors);

    let (GeometryElement::Curve(a), GeometryElement::Curve(b)) = (
        &first.project.alignments[0].geometry[1],
        &second.project.alignments[0].geometry[1],
    ) else {
        panic!("expected curves");
    };
    assert_eq!(b.meta.name.as_deref(), Some("C1"));
    assert_eq!(b.arc.direction, Rotation::Ccw);
    assert_abs_diff_eq!(b.arc.radius, 670.0 * 304.8, epsilon = 1e-6);
    assert_abs_diff_eq!(a.arc.delta, b.arc.delta, epsilon = 1e-9);
    assert_abs_diff_eq!(a.arc.pi, b.arc.pi, epsilon = 1e-6);
    assert_abs_diff_eq!(b.arc.pi.x / 304.8, 605.237275699633, epsilon = 1e-6);

    // The exported curve still evaluates and tessellates onto its circle.
    assert_abs_diff_eq!(b.arc.point_at(b.arc.length).unwrap(), b.arc.end, epsilon = 1e-6);
    let polyline = TessellateArc::new(
        &b.arc,
        TessellationParams {
            subdivision: Subdivision::Segments(16),
            ..TessellationParams::default()
        },
    )
    .execute()
    .unwrap();
    assert_eq!(polyline.points.len(), 17);
    for p in &polyline.points {
        assert_abs_diff_eq!((p - b.arc.center).norm(), b.arc.radius, epsilon = 1e-6);
    }
}
