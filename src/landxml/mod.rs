mod exporter;
mod importer;
mod schema;
mod tree;

pub use exporter::AlignmentExporter;
pub use importer::{AlignmentImporter, ImportError, ImportReport};
