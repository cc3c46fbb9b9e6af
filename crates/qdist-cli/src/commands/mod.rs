//! CLI command implementations.

pub mod circuit;
pub mod common;
pub mod demo;
pub mod estimate;
pub mod version;
