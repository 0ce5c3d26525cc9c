//! Error types for nix-flake

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while evaluating a flake expression
#[derive(Error, Debug)]
pub enum NixError {
    /// Nix command not found
    #[error("Nix is not installed or not in PATH (looked for {0:?})")]
    NixNotFound(PathBuf),

    /// `nix eval` exited unsuccessfully
    #[error("Evaluation of `{expression}` failed{}: {stderr}", status_suffix(.status))]
    EvalFailed {
        expression: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Name that cannot be written as a single attribute path segment
    #[error("Attribute name {0:?} cannot be used in a flake attribute path")]
    InvalidAttrName(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit status {})", code),
        None => String::new(),
    }
}
