//! Repository façade over a flake evaluator.
//!
//! Each query builds an expression path, evaluates it and decodes the JSON
//! into a domain type. Paths follow
//! `<namespace>.clusters[.<cluster>][.<subpath>]`, which is the schema the
//! flake exposes; changing them breaks compatibility with existing flakes.

use std::collections::BTreeMap;
use std::sync::Arc;

use nix_flake::{Evaluator, NixError};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{ClusterProperties, ResourceManifest, ValidationResult};
use crate::error::{RepositoryError, Result};

/// Attribute paths the flake publishes its cluster data under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionRoots {
    /// Root of per-cluster declared attributes
    pub properties: String,
    /// Root of per-cluster manifests and validation
    pub resources: String,
}

impl Default for ExpressionRoots {
    fn default() -> Self {
        ExpressionRoots {
            properties: "kube._app".to_string(),
            resources: "kube".to_string(),
        }
    }
}

/// Read-only view of the clusters declared by a flake
#[derive(Debug)]
pub struct Repository<E> {
    evaluator: Arc<E>,
    roots: ExpressionRoots,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            evaluator: Arc::clone(&self.evaluator),
            roots: self.roots.clone(),
        }
    }
}

impl<E: Evaluator> Repository<E> {
    pub fn new(evaluator: E) -> Self {
        Self::with_roots(evaluator, ExpressionRoots::default())
    }

    pub fn with_roots(evaluator: E, roots: ExpressionRoots) -> Self {
        Repository {
            evaluator: Arc::new(evaluator),
            roots,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Properties of a single cluster
    pub fn get_cluster_properties(&self, cluster: &str) -> Result<ClusterProperties> {
        self.query_clusters(&self.roots.properties, Some(cluster), None)
    }

    /// Properties of every cluster, keyed by cluster name
    pub fn get_clusters_properties(&self) -> Result<BTreeMap<String, ClusterProperties>> {
        self.query_clusters(&self.roots.properties, None, None)
    }

    /// All resources declared by a cluster, in declaration order
    pub fn get_cluster_manifests(&self, cluster: &str) -> Result<Vec<ResourceManifest>> {
        self.query_clusters(&self.roots.resources, Some(cluster), Some("manifests"))
    }

    /// Validate all resources of a cluster.
    ///
    /// Evaluating validation can take a long time on large clusters.
    pub fn validate_cluster(&self, cluster: &str) -> Result<ValidationResult> {
        self.query_clusters(&self.roots.resources, Some(cluster), Some("validation"))
    }

    /// Names that cannot be addressed fail here, before the evaluator runs.
    fn query_clusters<T: DeserializeOwned>(
        &self,
        namespace: &str,
        cluster: Option<&str>,
        subpath: Option<&str>,
    ) -> Result<T> {
        match clusters_path(namespace, cluster, subpath) {
            Ok(expression) => self.query(&expression),
            Err(source) => Err(RepositoryError::Evaluation {
                expression: [Some(namespace), Some("clusters"), cluster, subpath]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("."),
                source,
            }),
        }
    }

    fn query<T: DeserializeOwned>(&self, expression: &str) -> Result<T> {
        debug!(%expression, "Querying flake");

        let out = self
            .evaluator
            .eval(expression)
            .map_err(|source| RepositoryError::Evaluation {
                expression: expression.to_string(),
                source,
            })?;

        serde_json::from_slice(&out).map_err(|source| RepositoryError::Decode {
            expression: expression.to_string(),
            source,
        })
    }
}

/// `<namespace>.clusters[.<cluster>][.<subpath>]`
pub fn clusters_path(
    namespace: &str,
    cluster: Option<&str>,
    subpath: Option<&str>,
) -> std::result::Result<String, NixError> {
    let mut path = format!("{}.clusters", namespace);
    if let Some(cluster) = cluster {
        path.push('.');
        path.push_str(&attr_name(cluster)?);
    }
    if let Some(subpath) = subpath {
        path.push('.');
        path.push_str(subpath);
    }
    Ok(path)
}

/// Render `name` as a single segment of the attribute path after `#`.
///
/// Bare identifiers pass through unchanged; anything else (dots, spaces,
/// an empty name) is wrapped in double quotes. Nix splits that path on
/// unquoted dots and knows no escape sequences, so a name containing `"`
/// cannot be written at all.
fn attr_name(name: &str) -> std::result::Result<String, NixError> {
    if is_bare_identifier(name) {
        return Ok(name.to_string());
    }
    if name.contains('"') {
        return Err(NixError::InvalidAttrName(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '-'))
}
