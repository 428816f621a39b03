//! Round-robin dispatcher.
//!
//! # Responsibilities
//! - Own the backend list and the rotation cursor
//! - Pick the next backend for every inbound request
//! - Forward the request to it and stream the response back
//!
//! Each request gets exactly one attempt. A failed exchange is reported to
//! the caller and the cursor keeps moving.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, Response, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::request::{append_forwarded_for, request_id};
use crate::http::response::strip_hop_by_hop;
use crate::load_balancer::backend::ProxyTarget;
use crate::load_balancer::pool::BackendList;
use crate::load_balancer::round_robin::RoundRobin;
use crate::observability::metrics;

/// Selects backends in rotation and proxies requests to them.
#[derive(Debug)]
pub struct Dispatcher {
    backends: BackendList,
    rotation: RoundRobin,
    client: Client<HttpConnector, Body>,
}

impl Dispatcher {
    /// Create a dispatcher over `backends` with a fresh cursor at index 0.
    pub fn new(backends: BackendList, upstream: &UpstreamConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(upstream.connect_timeout_secs)));

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(upstream.pool_idle_timeout_secs))
            .build(connector);

        Self {
            backends,
            rotation: RoundRobin::new(),
            client,
        }
    }

    pub fn backends(&self) -> &BackendList {
        &self.backends
    }

    /// Return the backend at the cursor and advance the cursor.
    pub fn select_backend(&self) -> &str {
        let index = self.rotation.next_index(self.backends.len());
        &self.backends[index]
    }

    /// Route one request to the next backend in rotation.
    pub async fn handle(
        &self,
        request: Request<Body>,
        peer: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let start = Instant::now();
        let backend = self.select_backend();
        let method = request.method().to_string();

        tracing::info!(
            request_id = %request_id(request.headers()),
            method = %method,
            path = %request.uri().path(),
            backend = %backend,
            "Routing request"
        );

        let result = self.forward(backend, request, peer).await;
        let status = match &result {
            Ok(response) => response.status(),
            Err(e) => e.status_code(),
        };
        metrics::record_request(status.as_u16(), backend, start);
        result
    }

    async fn forward(
        &self,
        backend: &str,
        request: Request<Body>,
        peer: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let target = ProxyTarget::parse(backend)?;

        let (mut parts, body) = request.into_parts();
        parts.uri = target.rewrite(&parts.uri)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        append_forwarded_for(&mut parts.headers, peer);

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|source| ProxyError::UpstreamUnavailable {
                backend: backend.to_string(),
                source,
            })?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
