use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{Duration, Utc};
use tracing::warn;

use crate::AppState;
use crate::charts::{LineChart, PieChart, downsample};
use crate::clients::ClientError;
use crate::helpers::{fmt_bucket, query_time};
use crate::models::api::Envelope;
use crate::models::views::*;

// --- Shared plumbing ---

#[derive(Debug, Clone)]
struct Breadcrumb {
    label: String,
    url: String,
}

fn render_template(tmpl: &impl Template) -> Response {
    match tmpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn crumbs(trail: &[(&str, &str)]) -> Vec<Breadcrumb> {
    trail
        .iter()
        .map(|(label, url)| Breadcrumb {
            label: label.to_string(),
            url: url.to_string(),
        })
        .collect()
}

/// Collapses the two failure kinds into one displayable message: transport
/// errors stringify, failed envelopes surface the backend's error text.
fn unwrap_envelope<T>(
    res: Result<Envelope<T>, ClientError>,
    fallback: &str,
) -> Result<T, String> {
    match res {
        Ok(env) => env.into_data(fallback),
        Err(e) => Err(e.to_string()),
    }
}

/// Query bounds for the trailing 24 hours, in the backend's time format.
fn last_day_range() -> (String, String) {
    let end = Utc::now();
    let start = end - Duration::hours(24);
    (query_time(start), query_time(end))
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    message: String,
}

fn render_error(title: &str, nav: &str, message: String) -> Response {
    let tmpl = ErrorTemplate {
        title: title.to_string(),
        current_nav: nav.to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), (title, "")]),
        message,
    };
    render_template(&tmpl)
}

// --- Home ---

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    cluster_name: String,
    cards: Vec<StatCard>,
    trend: LineChart,
    pie: PieChart,
}

pub async fn handle_home(State(state): State<AppState>) -> Response {
    let ns = state.config.home_namespace.clone();

    let (node_res, pod_res) = tokio::join!(
        state.client.node_avg_today(),
        state.client.namespace_avg_today(&ns),
    );

    // The home cards degrade to empty values instead of failing the page.
    let node_avg = unwrap_envelope(node_res, "Failed to load node averages")
        .unwrap_or_else(|e| {
            warn!("node averages unavailable: {}", e);
            (None, None)
        });
    let pod_avg = unwrap_envelope(pod_res, "Failed to load namespace averages")
        .unwrap_or_else(|e| {
            warn!("namespace averages unavailable: {}", e);
            (None, None)
        });

    let cards = vec![
        StatCard::number("Node CPU Avg (Today)", node_avg.0, "mCores"),
        StatCard::memory("Node Mem Avg (Today)", node_avg.1),
        StatCard::number(&format!("Pod CPU Avg (Today, {} ns)", ns), pod_avg.0, "mCores"),
        StatCard::memory(&format!("Pod Mem Avg (Today, {} ns)", ns), pod_avg.1),
    ];

    // Illustrative series, same shape the original console shipped with.
    let trend = LineChart::build(
        ["00h", "06h", "12h", "18h", "24h"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![
            ("Node CPU".to_string(), "#b45309", vec![30.0, 40.0, 35.0, 50.0, 45.0]),
            ("Pod CPU".to_string(), "#14b8a6", vec![20.0, 25.0, 30.0, 28.0, 32.0]),
        ],
    );
    let pie = PieChart::build(&[
        ("default".to_string(), 45.0, "#b45309"),
        ("kube-system".to_string(), 35.0, "#14b8a6"),
        ("monitoring".to_string(), 20.0, "#f59e0b"),
    ]);

    let tmpl = HomeTemplate {
        title: "Home".to_string(),
        current_nav: "home".to_string(),
        breadcrumbs: crumbs(&[("Home", "/")]),
        cluster_name: state.config.cluster_name.clone(),
        cards,
        trend,
        pie,
    };

    render_template(&tmpl)
}

// --- Nodes ---

#[derive(Template)]
#[template(path = "nodes.html")]
struct NodesTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    nodes: Vec<NodeRow>,
}

pub async fn handle_nodes(State(state): State<AppState>) -> Response {
    let nodes = match unwrap_envelope(state.client.list_nodes().await, "Failed to load nodes") {
        Ok(nodes) => nodes,
        Err(e) => return render_error("Nodes", "nodes", e),
    };

    let tmpl = NodesTemplate {
        title: "Nodes".to_string(),
        current_nav: "nodes".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Nodes", "/nodes")]),
        nodes: nodes.iter().map(build_node_row).collect(),
    };

    render_template(&tmpl)
}

// --- Node Detail ---

#[derive(Template)]
#[template(path = "node_detail.html")]
struct NodeDetailTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    node: NodeRow,
}

pub async fn handle_node_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let nodes = match unwrap_envelope(state.client.list_nodes().await, "Failed to load node") {
        Ok(nodes) => nodes,
        Err(e) => return render_error("Node", "nodes", e),
    };

    let Some(node) = nodes.iter().find(|n| n.node_id == id) else {
        return render_error("Node", "nodes", "Node not found".to_string());
    };

    let row = build_node_row(node);
    let tmpl = NodeDetailTemplate {
        title: format!("Node: {}", row.name),
        current_nav: "nodes".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Nodes", "/nodes"), (&row.name, "")]),
        node: row,
    };

    render_template(&tmpl)
}

// --- Node Metrics ---

#[derive(Template)]
#[template(path = "node_metrics.html")]
struct NodeMetricsTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    has_metrics: bool,
    cards: Vec<StatCard>,
    chart: LineChart,
    rows: Vec<MetricRow>,
}

pub async fn handle_node_metrics(State(state): State<AppState>) -> Response {
    let (start, end) = last_day_range();
    let metrics = match unwrap_envelope(
        state.client.node_metrics_between(&start, &end).await,
        "Failed to load node metrics",
    ) {
        Ok(m) => m,
        Err(e) => return render_error("Node Metrics", "nodes-metrics", e),
    };

    let mut tmpl = NodeMetricsTemplate {
        title: "Node Metrics (Last 24h)".to_string(),
        current_nav: "nodes-metrics".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Nodes", "/nodes"), ("Metrics", "/nodes/metrics")]),
        has_metrics: !metrics.is_empty(),
        cards: Vec::new(),
        chart: LineChart::default(),
        rows: Vec::new(),
    };

    if let Some(latest) = metrics.last() {
        tmpl.cards = vec![
            StatCard::number("Latest CPU", Some(latest.cpu_mcores), "mCores"),
            StatCard::memory("Latest Memory", Some(latest.memory_bytes)),
        ];

        let sampled = downsample(&metrics, state.config.chart_stride);
        let labels = sampled.iter().map(|m| fmt_bucket(&m.timestamp)).collect();
        let cpu: Vec<f64> = sampled.iter().map(|m| m.cpu_mcores).collect();
        let mem: Vec<f64> = sampled
            .iter()
            .map(|m| m.memory_bytes / (1024.0 * 1024.0 * 1024.0))
            .collect();
        tmpl.chart = LineChart::build(
            labels,
            vec![
                ("CPU (mCores)".to_string(), "#f59e0b", cpu),
                ("Memory (GB)".to_string(), "#14b8a6", mem),
            ],
        );

        tmpl.rows = metrics.iter().map(build_metric_row).collect();
    }

    render_template(&tmpl)
}

// --- Pods ---

#[derive(Template)]
#[template(path = "pods.html")]
struct PodsTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    pods: Vec<PodRow>,
}

pub async fn handle_pods(State(state): State<AppState>) -> Response {
    let pods = match unwrap_envelope(state.client.list_pods().await, "Failed to load pods") {
        Ok(pods) => pods,
        Err(e) => return render_error("Pods", "pods", e),
    };

    let tmpl = PodsTemplate {
        title: "Pods".to_string(),
        current_nav: "pods".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Pods", "/pods")]),
        pods: pods.iter().map(build_pod_row).collect(),
    };

    render_template(&tmpl)
}

// --- Pod Detail ---

#[derive(Template)]
#[template(path = "pod_detail.html")]
struct PodDetailTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    pod: PodRow,
    has_metrics: bool,
    cpu_chart: LineChart,
    mem_chart: LineChart,
}

pub async fn handle_pod_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let (start, end) = last_day_range();
    let (pods_res, metrics_res) = tokio::join!(
        state.client.list_pods(),
        state.client.pod_metrics_between(&start, &end, Some(id)),
    );

    // Both halves report; failures are aggregated instead of overwriting
    // each other.
    let mut errors = Vec::new();
    let pods = unwrap_envelope(pods_res, "Failed to load pod").unwrap_or_else(|e| {
        errors.push(e);
        Vec::new()
    });
    let metrics =
        unwrap_envelope(metrics_res, "Failed to load pod metrics").unwrap_or_else(|e| {
            errors.push(e);
            Vec::new()
        });
    if !errors.is_empty() {
        return render_error("Pod", "pods", errors.join("; "));
    }

    let Some(pod) = pods.iter().find(|p| p.pod_id == id) else {
        return render_error("Pod", "pods", "Pod not found".to_string());
    };

    let labels: Vec<String> = metrics.iter().map(|m| fmt_bucket(&m.bucket)).collect();
    let cpu: Vec<f64> = metrics.iter().map(|m| m.avg_cpu).collect();
    let mem: Vec<f64> = metrics
        .iter()
        .map(|m| m.avg_mem / (1024.0 * 1024.0))
        .collect();

    let row = build_pod_row(pod);
    let tmpl = PodDetailTemplate {
        title: format!("Pod: {}", row.name),
        current_nav: "pods".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Pods", "/pods"), (&row.name, "")]),
        pod: row,
        has_metrics: !metrics.is_empty(),
        cpu_chart: LineChart::build(
            labels.clone(),
            vec![("CPU".to_string(), "#f59e0b", cpu)],
        ),
        mem_chart: LineChart::build(labels, vec![("Memory".to_string(), "#3b82f6", mem)]),
    };

    render_template(&tmpl)
}

// --- Pod / Namespace Metrics pointer page ---

#[derive(Template)]
#[template(path = "pod_metrics.html")]
struct PodMetricsTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
}

pub async fn handle_pod_metrics_info() -> Response {
    let tmpl = PodMetricsTemplate {
        title: "Pod / Namespace Metrics".to_string(),
        current_nav: "pods-metrics".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Pods", "/pods"), ("Metrics", "/pods/metrics")]),
    };
    render_template(&tmpl)
}

// --- Namespaces ---

#[derive(Template)]
#[template(path = "namespaces.html")]
struct NamespacesTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    namespaces: Vec<String>,
}

pub async fn handle_namespaces(State(state): State<AppState>) -> Response {
    let namespaces = match unwrap_envelope(
        state.client.list_namespaces().await,
        "Failed to load namespaces",
    ) {
        Ok(ns) => ns,
        Err(e) => return render_error("Namespaces", "pods-namespaces", e),
    };

    let tmpl = NamespacesTemplate {
        title: "Namespaces".to_string(),
        current_nav: "pods-namespaces".to_string(),
        breadcrumbs: crumbs(&[("Home", "/"), ("Namespaces", "/pods/namespaces")]),
        namespaces,
    };

    render_template(&tmpl)
}

// --- Namespace Detail ---

#[derive(Template)]
#[template(path = "namespace_detail.html")]
struct NamespaceDetailTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
    namespace: String,
    pods: Vec<PodRow>,
    has_metrics: bool,
    cpu_chart: LineChart,
    mem_chart: LineChart,
}

pub async fn handle_namespace_detail(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Response {
    let (start, end) = last_day_range();
    let (pods_res, metrics_res) = tokio::join!(
        state.client.pods_by_namespace(&namespace),
        state
            .client
            .namespace_metrics_between(&namespace, &start, &end),
    );

    let mut errors = Vec::new();
    let pods = unwrap_envelope(pods_res, "Failed to load pods").unwrap_or_else(|e| {
        errors.push(e);
        Vec::new()
    });
    let metrics = unwrap_envelope(metrics_res, "Failed to load namespace metrics")
        .unwrap_or_else(|e| {
            errors.push(e);
            Vec::new()
        });
    if !errors.is_empty() {
        return render_error("Namespace", "pods-namespaces", errors.join("; "));
    }

    let labels: Vec<String> = metrics.iter().map(|m| fmt_bucket(&m.bucket)).collect();
    let cpu: Vec<f64> = metrics.iter().map(|m| m.avg_cpu).collect();
    let mem: Vec<f64> = metrics
        .iter()
        .map(|m| m.avg_mem / (1024.0 * 1024.0))
        .collect();

    let tmpl = NamespaceDetailTemplate {
        title: format!("Namespace: {}", namespace),
        current_nav: "pods-namespaces".to_string(),
        breadcrumbs: crumbs(&[
            ("Home", "/"),
            ("Namespaces", "/pods/namespaces"),
            (&namespace, ""),
        ]),
        namespace: namespace.clone(),
        pods: pods.iter().map(build_pod_row).collect(),
        has_metrics: !metrics.is_empty(),
        cpu_chart: LineChart::build(
            labels.clone(),
            vec![("CPU".to_string(), "#f59e0b", cpu)],
        ),
        mem_chart: LineChart::build(labels, vec![("Memory".to_string(), "#3b82f6", mem)]),
    };

    render_template(&tmpl)
}

// --- 404 ---

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    title: String,
    current_nav: String,
    breadcrumbs: Vec<Breadcrumb>,
}

pub async fn handle_not_found() -> Response {
    let tmpl = NotFoundTemplate {
        title: "Not Found".to_string(),
        current_nav: String::new(),
        breadcrumbs: crumbs(&[("Home", "/")]),
    };
    match tmpl.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
