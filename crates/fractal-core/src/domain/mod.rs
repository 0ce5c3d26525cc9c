//! Domain types decoded from the flake's JSON output.
//!
//! All of them are built fresh for each query and never mutated afterwards.

pub mod cluster;
pub mod manifest;
pub mod validation;

pub use cluster::ClusterProperties;
pub use manifest::ResourceManifest;
pub use validation::{ResourceValidation, ValidationCounts, ValidationResult, ValidationType};
