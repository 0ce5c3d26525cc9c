use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One declared Kubernetes-style object.
///
/// Kept as an unstructured JSON object; the accessors below read the
/// well-known fields without requiring them to be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceManifest(Map<String, Value>);

impl ResourceManifest {
    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// `None` for cluster-scoped objects
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    /// `kind/name` with the kind lower-cased, e.g. `deployment/web`
    pub fn display_name(&self) -> String {
        format!(
            "{}/{}",
            self.kind().unwrap_or("unknown").to_lowercase(),
            self.name().unwrap_or("<unnamed>")
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
    }
}
