//! Nix-Flake: the evaluation boundary for Fractal
//!
//! This crate turns a Nix flake into a function from expression path to
//! JSON bytes. Everything Fractal knows about clusters comes out of it.
//!
//! ## Key Components
//!
//! - `Evaluator`: the capability the rest of the workspace depends on
//! - `Flake`: evaluates expressions by spawning `nix eval --json`
//! - `fakes::StubEvaluator`: table-driven evaluator for tests

mod error;
pub mod fakes;
mod flake;

pub use error::NixError;
pub use flake::{Evaluator, Flake, FlakeConfig};

/// Result type for nix-flake operations
pub type Result<T> = std::result::Result<T, NixError>;
