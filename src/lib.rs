pub mod alignment;
pub mod csv;
pub mod error;
pub mod geometry;
pub mod landxml;
pub mod math;
pub mod operations;
pub mod station;
pub mod tessellation;
pub mod units;

pub use error::{GeoalignError, Result};
