use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared attributes of one cluster.
///
/// The façade does not interpret these; it only requires a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterProperties(Map<String, Value>);

impl ClusterProperties {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_any_object() {
        let props: ClusterProperties =
            serde_json::from_str(r#"{"region": "eu-west-1", "nodes": 3}"#).unwrap();

        assert_eq!(props.get("region"), Some(&Value::from("eu-west-1")));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["nodes", "region"]);
    }

    #[test]
    fn rejects_non_object() {
        assert!(serde_json::from_str::<ClusterProperties>("[1, 2]").is_err());
        assert!(serde_json::from_str::<ClusterProperties>("null").is_err());
    }
}
