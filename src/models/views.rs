use std::collections::BTreeMap;

use crate::helpers::{Scaled, fmt_number, fmt_timestamp, parse_labels, scale_bytes};
use crate::models::api::{Node, NodeMetric, Pod};

/// A single animated stat card. `target` is the raw numeric value the
/// count-up script interpolates towards; `value` is the preformatted display
/// text it settles on (em dash when the backend had no samples).
#[derive(Debug, Clone, Default)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub target: String,
    pub has_value: bool,
    pub unit: String,
}

impl StatCard {
    pub fn number(title: &str, value: Option<f64>, unit: &str) -> Self {
        match value {
            Some(v) => Self {
                title: title.to_string(),
                value: fmt_number(v),
                target: format!("{}", v),
                has_value: true,
                unit: unit.to_string(),
            },
            None => Self {
                title: title.to_string(),
                unit: unit.to_string(),
                ..Default::default()
            },
        }
    }

    /// Byte-valued card: scales into the largest fitting unit and carries the
    /// unit in the title, mirroring the CPU cards' layout.
    pub fn memory(title: &str, bytes: Option<f64>) -> Self {
        match bytes {
            Some(b) => {
                let Scaled { value, unit } = scale_bytes(b);
                Self {
                    title: format!("{} ({})", title, unit),
                    value: fmt_number(value),
                    target: format!("{}", value),
                    has_value: true,
                    unit: String::new(),
                }
            }
            None => Self {
                title: title.to_string(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabelBadge {
    pub text: String,
    pub highlight: bool,
}

/// Flattens a label map into display badges. App-identifying keys get the
/// accent style, matching the original console's highlighting.
pub fn label_badges(labels: &BTreeMap<String, String>) -> Vec<LabelBadge> {
    labels
        .iter()
        .map(|(k, v)| LabelBadge {
            text: if v.is_empty() {
                k.clone()
            } else {
                format!("{}={}", k, v)
            },
            highlight: k.contains("app") || k == "name",
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct NodeRow {
    pub node_id: i64,
    pub name: String,
    pub labels: Vec<LabelBadge>,
    pub created_at: String,
}

pub fn build_node_row(node: &Node) -> NodeRow {
    NodeRow {
        node_id: node.node_id,
        name: node.name.clone(),
        labels: node.labels.as_ref().map(|l| label_badges(l)).unwrap_or_default(),
        created_at: node
            .created_at
            .as_deref()
            .map(fmt_timestamp)
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PodRow {
    pub pod_id: i64,
    pub node_id: i64,
    pub name: String,
    pub namespace: String,
    pub labels: Vec<LabelBadge>,
}

pub fn build_pod_row(pod: &Pod) -> PodRow {
    PodRow {
        pod_id: pod.pod_id,
        node_id: pod.node_id,
        name: pod.name.clone(),
        namespace: pod.namespace.clone(),
        labels: label_badges(&parse_labels(&pod.labels)),
    }
}

/// One row of the node metrics sample table.
#[derive(Debug, Clone, Default)]
pub struct MetricRow {
    pub timestamp: String,
    pub cpu: String,
    pub memory: String,
}

pub fn build_metric_row(m: &NodeMetric) -> MetricRow {
    MetricRow {
        timestamp: fmt_timestamp(&m.timestamp),
        cpu: fmt_number(m.cpu_mcores),
        memory: format!("{:.2} GB", m.memory_bytes / (1024.0 * 1024.0 * 1024.0)),
    }
}
