//! In-memory evaluator fake (testing only)
//!
//! `StubEvaluator` answers expressions from a fixed table and records every
//! expression it was asked to evaluate, without spawning `nix`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::NixError;
use crate::flake::Evaluator;
use crate::Result;

#[derive(Debug, Clone)]
enum StubResponse {
    Output(Vec<u8>),
    Failure(String),
}

/// Deterministic evaluator backed by a `HashMap<expression, response>`.
#[derive(Debug, Default)]
pub struct StubEvaluator {
    responses: HashMap<String, StubResponse>,
    calls: Mutex<Vec<String>>,
}

impl StubEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `expression` with the given JSON text
    pub fn with_json(self, expression: &str, json: &str) -> Self {
        self.with_bytes(expression, json.as_bytes())
    }

    /// Answer `expression` with arbitrary bytes (possibly not JSON)
    pub fn with_bytes(mut self, expression: &str, bytes: &[u8]) -> Self {
        self.responses
            .insert(expression.to_string(), StubResponse::Output(bytes.to_vec()));
        self
    }

    /// Make `expression` fail as if `nix eval` exited with status 1
    pub fn with_failure(mut self, expression: &str, stderr: &str) -> Self {
        self.responses.insert(
            expression.to_string(),
            StubResponse::Failure(stderr.to_string()),
        );
        self
    }

    /// Expressions evaluated so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Evaluator for StubEvaluator {
    fn eval(&self, expression: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(expression.to_string());

        match self.responses.get(expression) {
            Some(StubResponse::Output(bytes)) => Ok(bytes.clone()),
            Some(StubResponse::Failure(stderr)) => Err(NixError::EvalFailed {
                expression: expression.to_string(),
                status: Some(1),
                stderr: stderr.clone(),
            }),
            None => Err(NixError::EvalFailed {
                expression: expression.to_string(),
                status: Some(1),
                stderr: format!("error: attribute '{}' missing", expression),
            }),
        }
    }
}
