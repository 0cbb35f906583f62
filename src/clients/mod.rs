use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::models::api::{AvgPair, Envelope, NamespaceMetric, Node, NodeMetric, Pod, PodMetric};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("GET {path} returned {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
}

/// Typed wrapper over the RustCost metrics backend. One method per endpoint,
/// one GET per call, no retry and no caching; every payload comes back in the
/// backend's `{success, data, error}` envelope, passed through unmodified.
pub struct MetricsClient {
    base_url: String,
    http: Client,
}

impl MetricsClient {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    // --- Nodes ---

    pub async fn list_nodes(&self) -> Result<Envelope<Vec<Node>>, ClientError> {
        self.get_envelope("/api/v1/nodes/node", &[]).await
    }

    /// Today's average `[cpu_mcores, memory_bytes]` across all nodes.
    pub async fn node_avg_today(&self) -> Result<Envelope<AvgPair>, ClientError> {
        self.get_envelope("/api/v1/nodes/node/avg", &[]).await
    }

    pub async fn node_metrics_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Envelope<Vec<NodeMetric>>, ClientError> {
        self.get_envelope(
            "/api/v1/nodes/node/metrics",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    // --- Pods ---

    pub async fn list_pods(&self) -> Result<Envelope<Vec<Pod>>, ClientError> {
        self.get_envelope("/api/v1/pods/pod", &[]).await
    }

    pub async fn list_namespaces(&self) -> Result<Envelope<Vec<String>>, ClientError> {
        self.get_envelope("/api/v1/pods/pod/namespaces", &[]).await
    }

    pub async fn pod_avg_today(&self, pod_id: i64) -> Result<Envelope<AvgPair>, ClientError> {
        self.get_envelope("/api/v1/pods/pod/avg", &[("pod_id", pod_id.to_string())])
            .await
    }

    pub async fn namespace_avg_today(&self, ns: &str) -> Result<Envelope<AvgPair>, ClientError> {
        self.get_envelope("/api/v1/pods/pod/avg_ns", &[("ns", ns.to_string())])
            .await
    }

    pub async fn pod_metrics_between(
        &self,
        start: &str,
        end: &str,
        pod_id: Option<i64>,
    ) -> Result<Envelope<Vec<PodMetric>>, ClientError> {
        let mut query = vec![("start", start.to_string()), ("end", end.to_string())];
        if let Some(id) = pod_id {
            query.push(("pod_id", id.to_string()));
        }
        self.get_envelope("/api/v1/pods/pod/metrics", &query).await
    }

    pub async fn namespace_metrics_between(
        &self,
        ns: &str,
        start: &str,
        end: &str,
    ) -> Result<Envelope<Vec<NamespaceMetric>>, ClientError> {
        self.get_envelope(
            "/api/v1/pods/pod/metrics_ns",
            &[
                ("ns", ns.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
            ],
        )
        .await
    }

    pub async fn pods_by_namespace(&self, ns: &str) -> Result<Envelope<Vec<Pod>>, ClientError> {
        self.get_envelope("/api/v1/pods/pod/by_ns", &[("ns", ns.to_string())])
            .await
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}
