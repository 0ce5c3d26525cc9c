//! Flake evaluation through the `nix` command
//!
//! Wraps `nix eval --json <flake>#<expression>` so callers can treat the
//! flake as a function from expression path to JSON bytes.

use crate::error::NixError;
use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that can evaluate an expression path to JSON bytes.
///
/// `Flake` is the real implementation; tests substitute
/// [`crate::fakes::StubEvaluator`].
pub trait Evaluator {
    /// Evaluate `expression` and return the raw JSON it produced.
    fn eval(&self, expression: &str) -> Result<Vec<u8>>;
}

impl<T: Evaluator + ?Sized> Evaluator for &T {
    fn eval(&self, expression: &str) -> Result<Vec<u8>> {
        (**self).eval(expression)
    }
}

impl<T: Evaluator + ?Sized> Evaluator for Box<T> {
    fn eval(&self, expression: &str) -> Result<Vec<u8>> {
        (**self).eval(expression)
    }
}

impl<T: Evaluator + ?Sized> Evaluator for Arc<T> {
    fn eval(&self, expression: &str) -> Result<Vec<u8>> {
        (**self).eval(expression)
    }
}

/// Flake configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlakeConfig {
    /// Flake reference (a path or any `nix` flake URL)
    pub flake_ref: String,
    /// `nix` executable to invoke
    pub nix_bin: PathBuf,
    /// Extra arguments passed to `nix eval` before the installable
    pub extra_args: Vec<String>,
}

impl FlakeConfig {
    /// Create config for a specific flake reference
    pub fn new(flake_ref: &str) -> Self {
        FlakeConfig {
            flake_ref: flake_ref.to_string(),
            nix_bin: PathBuf::from("nix"),
            extra_args: Vec::new(),
        }
    }

    /// Use a different `nix` executable
    pub fn with_nix_bin(mut self, nix_bin: impl Into<PathBuf>) -> Self {
        self.nix_bin = nix_bin.into();
        self
    }

    /// Append an argument to every `nix eval` invocation
    pub fn with_arg(mut self, arg: &str) -> Self {
        self.extra_args.push(arg.to_string());
        self
    }

    /// `<flake_ref>#<expression>`
    pub fn installable(&self, expression: &str) -> String {
        format!("{}#{}", self.flake_ref, expression)
    }
}

/// A Nix flake bound to a fixed configuration root
#[derive(Debug, Clone)]
pub struct Flake {
    config: FlakeConfig,
}

impl Flake {
    /// Create a flake handle
    pub fn new(config: FlakeConfig) -> Self {
        Flake { config }
    }
}

impl Evaluator for Flake {
    fn eval(&self, expression: &str) -> Result<Vec<u8>> {
        let installable = self.config.installable(expression);
        debug!(
            nix = %self.config.nix_bin.display(),
            %installable,
            "Evaluating flake expression"
        );

        let output = Command::new(&self.config.nix_bin)
            .arg("eval")
            .arg("--json")
            .args(&self.config.extra_args)
            .arg(&installable)
            .output()
            .map_err(|e| spawn_error(e, &self.config.nix_bin))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                %installable,
                status = ?output.status.code(),
                "nix eval failed"
            );
            return Err(NixError::EvalFailed {
                expression: expression.to_string(),
                status: output.status.code(),
                stderr,
            });
        }

        debug!(bytes = output.stdout.len(), "nix eval succeeded");
        Ok(output.stdout)
    }
}

fn spawn_error(err: std::io::Error, nix_bin: &Path) -> NixError {
    if err.kind() == ErrorKind::NotFound {
        NixError::NixNotFound(nix_bin.to_path_buf())
    } else {
        NixError::Io(err)
    }
}
