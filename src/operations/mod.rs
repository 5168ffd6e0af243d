mod resolve;

pub use resolve::{Parameters, ResolveArc};

#[cfg(test)]
pub(crate) use resolve::tests as resolve_tests;
