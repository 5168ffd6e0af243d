/// How an attribute value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Kept as text.
    Text,
    /// Plain number.
    Float,
    /// Length in document units, scaled to millimeters.
    Length,
    /// Angle in decimal degrees, converted to radians.
    Angle,
    /// `cw` or `ccw`.
    Rotation,
}

/// One attribute of a LandXML element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub xml: &'static str,
    pub kind: AttrKind,
    pub required: bool,
}

const fn req(xml: &'static str, kind: AttrKind) -> AttrSpec {
    AttrSpec {
        xml,
        kind,
        required: true,
    }
}

const fn opt(xml: &'static str, kind: AttrKind) -> AttrSpec {
    AttrSpec {
        xml,
        kind,
        required: false,
    }
}

use AttrKind::{Angle, Length, Rotation, Text};

/// `name` is required by the schema but defaulted by the importer.
pub const ALIGNMENT: &[AttrSpec] = &[
    req("length", Length),
    req("staStart", Length),
    opt("name", Text),
    opt("desc", Text),
    opt("oID", Text),
    opt("state", Text),
];

pub const STA_EQUATION: &[AttrSpec] = &[
    req("staAhead", Length),
    req("staInternal", Length),
    opt("staBack", Length),
    opt("staIncrement", Text),
    opt("desc", Text),
];

/// Attributes shared by every coordinate geometry element.
const ELEMENT_COMMON: [AttrSpec; 6] = [
    opt("name", Text),
    opt("desc", Text),
    opt("staStart", Length),
    opt("state", Text),
    opt("oID", Text),
    opt("note", Text),
];

pub const LINE: &[AttrSpec] = &[
    ELEMENT_COMMON[0],
    ELEMENT_COMMON[1],
    ELEMENT_COMMON[2],
    ELEMENT_COMMON[3],
    ELEMENT_COMMON[4],
    ELEMENT_COMMON[5],
    opt("dir", Angle),
    opt("length", Length),
];

pub const CURVE: &[AttrSpec] = &[
    ELEMENT_COMMON[0],
    ELEMENT_COMMON[1],
    ELEMENT_COMMON[2],
    ELEMENT_COMMON[3],
    ELEMENT_COMMON[4],
    ELEMENT_COMMON[5],
    req("rot", Rotation),
    opt("crvType", Text),
    opt("chord", Length),
    opt("delta", Angle),
    opt("dirStart", Angle),
    opt("dirEnd", Angle),
    opt("external", Length),
    opt("length", Length),
    opt("midOrd", Length),
    opt("radius", Length),
    opt("tangent", Length),
];

pub const SPIRAL: &[AttrSpec] = &[
    ELEMENT_COMMON[0],
    ELEMENT_COMMON[1],
    ELEMENT_COMMON[2],
    ELEMENT_COMMON[3],
    ELEMENT_COMMON[4],
    ELEMENT_COMMON[5],
    req("length", Length),
    req("radiusStart", Length),
    req("radiusEnd", Length),
    opt("rot", Rotation),
    opt("spiType", Text),
    opt("chord", Length),
    opt("constant", AttrKind::Float),
    opt("dirStart", Angle),
    opt("dirEnd", Angle),
    opt("tanLong", Length),
    opt("tanShort", Length),
];

/// Looks up an attribute in a table.
#[must_use]
pub fn find(table: &[AttrSpec], xml: &str) -> Option<AttrSpec> {
    table.iter().copied().find(|spec| spec.xml == xml)
}
