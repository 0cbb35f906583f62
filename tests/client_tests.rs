use mockito::Matcher;
use rustcost_console::clients::{ClientError, MetricsClient};

#[tokio::test]
async fn list_nodes_passes_envelope_through() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/nodes/node")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"data":[{"node_id":1,"name":"worker-1","labels":{"zone":"a"},"created_at":"2025-01-01T00:00:00"}]}"#,
        )
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client.list_nodes().await.unwrap();

    // pass-through contract: the envelope arrives exactly as sent
    assert!(env.success);
    assert_eq!(env.error, None);
    let nodes = env.data.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].node_id, 1);
    assert_eq!(nodes[0].name, "worker-1");
    assert_eq!(
        nodes[0].labels.as_ref().unwrap().get("zone").map(String::as_str),
        Some("a")
    );
}

#[tokio::test]
async fn failed_envelope_is_not_rewritten() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/pods/pod")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"error":"database offline"}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client.list_pods().await.unwrap();

    assert!(!env.success);
    assert!(env.data.is_none());
    assert_eq!(env.error.as_deref(), Some("database offline"));
}

#[tokio::test]
async fn http_error_status_surfaces_as_client_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/nodes/node/avg")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let err = client.node_avg_today().await.unwrap_err();

    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn node_avg_today_decodes_nullable_tuple() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/nodes/node/avg")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[120.0,null]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client.node_avg_today().await.unwrap();
    assert_eq!(env.data, Some((Some(120.0), None)));
}

#[tokio::test]
async fn node_metrics_between_sends_time_bounds() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/nodes/node/metrics")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "2025-01-01T00:00:00".into()),
            Matcher::UrlEncoded("end".into(), "2025-01-02T00:00:00".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client
        .node_metrics_between("2025-01-01T00:00:00", "2025-01-02T00:00:00")
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(env.data, Some(Vec::new()));
}

#[tokio::test]
async fn pod_metrics_between_includes_pod_id_only_when_given() {
    let mut server = mockito::Server::new_async().await;
    let with_id = server
        .mock("GET", "/api/v1/pods/pod/metrics")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "a".into()),
            Matcher::UrlEncoded("end".into(), "b".into()),
            Matcher::UrlEncoded("pod_id".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    client
        .pod_metrics_between("a", "b", Some(7))
        .await
        .unwrap();
    with_id.assert_async().await;

    let without_id = server
        .mock("GET", "/api/v1/pods/pod/metrics")
        .match_query(Matcher::Exact("start=a&end=b".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[]}"#)
        .create_async()
        .await;

    client.pod_metrics_between("a", "b", None).await.unwrap();
    without_id.assert_async().await;
}

#[tokio::test]
async fn pod_avg_today_sends_pod_id() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/pods/pod/avg")
        .match_query(Matcher::UrlEncoded("pod_id".into(), "42".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[12.5,2048.0]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client.pod_avg_today(42).await.unwrap();

    m.assert_async().await;
    assert_eq!(env.data, Some((Some(12.5), Some(2048.0))));
}

#[tokio::test]
async fn namespace_queries_carry_the_namespace() {
    let mut server = mockito::Server::new_async().await;
    let by_ns = server
        .mock("GET", "/api/v1/pods/pod/by_ns")
        .match_query(Matcher::UrlEncoded("ns".into(), "kube-system".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"data":[{"pod_id":3,"node_id":1,"name":"dns","namespace":"kube-system","labels":"{}"}]}"#,
        )
        .create_async()
        .await;
    let avg_ns = server
        .mock("GET", "/api/v1/pods/pod/avg_ns")
        .match_query(Matcher::UrlEncoded("ns".into(), "kube-system".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":[35.5,1048576.0]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());

    let pods = client
        .pods_by_namespace("kube-system")
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(pods[0].name, "dns");
    by_ns.assert_async().await;

    let avg = client.namespace_avg_today("kube-system").await.unwrap();
    assert_eq!(avg.data, Some((Some(35.5), Some(1_048_576.0))));
    avg_ns.assert_async().await;
}

#[tokio::test]
async fn list_namespaces_returns_plain_strings() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/pods/pod/namespaces")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":["default","kube-system"]}"#)
        .create_async()
        .await;

    let client = MetricsClient::new(server.url());
    let env = client.list_namespaces().await.unwrap();
    assert_eq!(
        env.data,
        Some(vec!["default".to_string(), "kube-system".to_string()])
    );
}
