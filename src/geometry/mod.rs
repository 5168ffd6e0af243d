pub mod curve;
pub mod spiral;

pub use curve::{ArcDescriptor, Curve, ResolvedArc, Tangent};
pub use spiral::{SpiralParams, SpiralType};
