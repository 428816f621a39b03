//! End-to-end routing tests through a live proxy.

use std::collections::HashMap;

use axum::http::StatusCode;
use round_robin_proxy::config::{ConfigError, ProxyConfig};
use round_robin_proxy::lifecycle;
use round_robin_proxy::ProxyError;

mod common;

#[tokio::test]
async fn test_requests_rotate_in_list_order() {
    let a = common::start_named_backend("a").await;
    let b = common::start_named_backend("b").await;
    let c = common::start_named_backend("c").await;

    let proxy = common::start_proxy(&format!("http://{},http://{},http://{}", a, b, c)).await;
    let url = format!("http://{}/", proxy.local_addr());
    let client = common::client();

    let mut seen = Vec::new();
    for _ in 0..6 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        seen.push(res.text().await.unwrap());
    }
    assert_eq!(seen, ["a", "b", "c", "a", "b", "c"]);

    proxy.stop().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_backend_returns_bad_gateway_and_rotation_continues() {
    let a = common::start_named_backend("a").await;
    let b = common::unreachable_addr().await;
    let c = common::start_named_backend("c").await;

    let proxy = common::start_proxy(&format!("http://{},http://{},http://{}", a, b, c)).await;
    let url = format!("http://{}/", proxy.local_addr());
    let client = common::client();

    let first = client.get(&url).send().await.unwrap();
    assert_eq!(first.text().await.unwrap(), "a");

    let second = client.get(&url).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_GATEWAY);

    let third = client.get(&url).send().await.unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    assert_eq!(third.text().await.unwrap(), "c");

    proxy.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_backend_fails_only_its_turn() {
    let a = common::start_named_backend("a").await;

    let proxy = common::start_proxy(&format!("http://{},not a url", a)).await;
    let url = format!("http://{}/", proxy.local_addr());
    let client = common::client();

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "a");

    let failed = client.get(&url).send().await.unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "a");

    proxy.stop().await.unwrap();
}

#[tokio::test]
async fn test_method_path_query_headers_and_body_pass_through() {
    let echo = common::start_echo_backend().await;

    let proxy = common::start_proxy(&format!("http://{}", echo)).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/items/42?sort=desc", proxy.local_addr()))
        .header("x-custom", "kept")
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-backend"], "echo");
    let response_id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(response_id.len(), 36);

    let body = res.text().await.unwrap();
    assert!(body.starts_with("POST /items/42?sort=desc "), "{}", body);
    assert!(body.contains("xff=127.0.0.1"), "{}", body);
    assert!(body.contains(&format!("rid={}", response_id)), "{}", body);
    assert!(body.contains("custom=kept"), "{}", body);
    assert!(body.ends_with("body=payload"), "{}", body);

    proxy.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_are_spread_evenly() {
    let a = common::start_named_backend("a").await;
    let b = common::start_named_backend("b").await;
    let c = common::start_named_backend("c").await;

    let proxy = common::start_proxy(&format!("http://{},http://{},http://{}", a, b, c)).await;
    let url = format!("http://{}/", proxy.local_addr());
    let client = common::client();

    let tasks: Vec<_> = (0..30)
        .map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move { client.get(&url).send().await.unwrap().text().await.unwrap() })
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(task.await.unwrap()).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 3);
    for name in ["a", "b", "c"] {
        assert_eq!(counts[name], 10, "backend {} got {:?}", name, counts);
    }

    proxy.stop().await.unwrap();
}

#[tokio::test]
async fn test_empty_host_list_never_serves() {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();

    let result = lifecycle::start(config, " , ").await;
    assert!(matches!(
        result,
        Err(ProxyError::Configuration(ConfigError::EmptyHosts { .. }))
    ));
}

#[tokio::test]
async fn test_stop_closes_listener() {
    let a = common::start_named_backend("a").await;
    let proxy = common::start_proxy(&format!("http://{}", a)).await;
    let addr = proxy.local_addr();

    proxy.stop().await.unwrap();

    let client = common::client();
    assert!(client.get(format!("http://{}/", addr)).send().await.is_err());
}
