use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// DTOs mirrored from the RustCost backend. All fields arrive as the backend
// serializes them; nothing is validated client-side beyond optional presence.

/// Uniform response envelope wrapped around every backend payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Splits the envelope into its payload or the backend's error string,
    /// substituting `fallback` when a failed envelope carries no message.
    pub fn into_data(self, fallback: &str) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| fallback.to_string())),
        }
    }
}

/// Today's average `[cpu_mcores, memory_bytes]`; either element may be null
/// when no samples exist for the day.
pub type AvgPair = (Option<f64>, Option<f64>);

// --- Nodes ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Node {
    // Older backend builds expose this column as "id".
    #[serde(alias = "id")]
    pub node_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One raw sample row per node and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NodeMetric {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub cpu_mcores: f64,
    #[serde(default)]
    pub memory_bytes: f64,
}

// --- Pods ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pod {
    #[serde(default)]
    pub pod_id: i64,
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Serialized JSON object; parse with `helpers::parse_labels`.
    #[serde(default)]
    pub labels: String,
}

/// Averaged usage over one time bucket for a single pod.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PodMetric {
    #[serde(default)]
    pub pod_id: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub avg_cpu: f64,
    #[serde(default)]
    pub avg_mem: f64,
}

/// Averaged usage over one time bucket for a whole namespace.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NamespaceMetric {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub avg_cpu: f64,
    #[serde(default)]
    pub avg_mem: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_into_data_success() {
        let env = Envelope {
            success: true,
            data: Some(vec![1, 2]),
            error: None,
        };
        assert_eq!(env.into_data("fallback"), Ok(vec![1, 2]));
    }

    #[test]
    fn envelope_into_data_uses_backend_error() {
        let env: Envelope<Vec<i32>> = Envelope {
            success: false,
            data: None,
            error: Some("db offline".to_string()),
        };
        assert_eq!(env.into_data("fallback"), Err("db offline".to_string()));
    }

    #[test]
    fn envelope_into_data_falls_back_when_no_message() {
        let env: Envelope<Vec<i32>> = Envelope {
            success: false,
            data: None,
            error: None,
        };
        assert_eq!(env.into_data("Failed to load"), Err("Failed to load".to_string()));

        // success:true with a missing payload is still a failure
        let env: Envelope<Vec<i32>> = Envelope {
            success: true,
            data: None,
            error: None,
        };
        assert!(env.into_data("Failed to load").is_err());
    }

    #[test]
    fn node_accepts_id_alias() {
        let n: Node = serde_json::from_str(r#"{"id": 7, "name": "worker-1"}"#).unwrap();
        assert_eq!(n.node_id, 7);

        let n: Node = serde_json::from_str(r#"{"node_id": 9, "name": "worker-2"}"#).unwrap();
        assert_eq!(n.node_id, 9);
    }

    #[test]
    fn avg_pair_deserializes_nulls() {
        let env: Envelope<AvgPair> =
            serde_json::from_str(r#"{"success": true, "data": [120.0, null]}"#).unwrap();
        assert_eq!(env.data, Some((Some(120.0), None)));
    }
}
