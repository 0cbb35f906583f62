pub mod ui;

use axum::{Router, routing::get};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Home
        .route("/", get(ui::handle_home))
        // Nodes
        .route("/nodes", get(ui::handle_nodes))
        .route("/nodes/metrics", get(ui::handle_node_metrics))
        .route("/nodes/{id}", get(ui::handle_node_detail))
        // Pods
        .route("/pods", get(ui::handle_pods))
        .route("/pods/metrics", get(ui::handle_pod_metrics_info))
        .route("/pods/namespaces", get(ui::handle_namespaces))
        .route("/pods/ns/{namespace}", get(ui::handle_namespace_detail))
        .route("/pods/{id}", get(ui::handle_pod_detail))
        // Namespaces (canonical detail path; /pods/ns/{ns} is the legacy alias)
        .route("/namespaces/{namespace}", get(ui::handle_namespace_detail))
        // Health
        .route("/healthz", get(handle_healthz))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Catch-all
        .fallback(ui::handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn handle_healthz() -> &'static str {
    "ok\n"
}
