//! Fractal Core Library
//!
//! Reads cluster topology and validation results out of a Nix flake and
//! renders them. All validation logic lives in the flake; this crate only
//! evaluates expressions, decodes the JSON and presents it.
//!
//! ## Key Components
//!
//! - `Repository`: the query façade over an [`Evaluator`]
//! - `domain`: cluster properties, manifests and validation results
//! - `render`: tables and JSON driven by an explicit `OutputConfig`
//! - `progress`: spinner around long-running evaluations

pub mod domain;
mod error;
pub mod progress;
pub mod render;
pub mod repository;
pub mod telemetry;

pub use domain::{
    ClusterProperties, ResourceManifest, ResourceValidation, ValidationCounts, ValidationResult,
    ValidationType,
};
pub use error::{RepositoryError, Result};
pub use progress::{spinner, wait_with_progress};
pub use render::OutputConfig;
pub use repository::{ExpressionRoots, Repository};

pub use nix_flake::{Evaluator, Flake, FlakeConfig, NixError};
