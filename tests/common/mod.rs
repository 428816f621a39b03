//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri},
    Router,
};
use round_robin_proxy::config::ProxyConfig;
use round_robin_proxy::lifecycle::{self, RunningProxy};
use tokio::net::TcpListener;

/// Start a backend that answers every request with `name`.
pub async fn start_named_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move || async move { name });
    serve(app).await
}

/// Start a backend that echoes the request line, selected headers and body.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    let app = Router::new().fallback(
        |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_string()
            };
            let reply = format!(
                "{} {} xff={} rid={} custom={} body={}",
                method,
                uri,
                header("x-forwarded-for"),
                header("x-request-id"),
                header("x-custom"),
                String::from_utf8_lossy(&body)
            );
            ([("x-backend", "echo")], reply)
        },
    );
    serve(app).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start the proxy on an ephemeral port in front of `hosts`.
pub async fn start_proxy(hosts: &str) -> RunningProxy {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    lifecycle::start(config, hosts).await.expect("proxy should start")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
