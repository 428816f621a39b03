//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by backend and status
//! - `proxy_request_duration_seconds` (histogram): latency per backend
//!
//! Recording is a no-op until a recorder is installed, so the exporter is
//! optional.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one proxied request.
pub fn record_request(status: u16, backend: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "backend" => backend.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "proxy_request_duration_seconds",
        "backend" => backend.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use std::sync::Mutex;

    /// Remembers the name and labels of every registered metric.
    #[derive(Default)]
    struct KeyLog {
        keys: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl KeyLog {
        fn push(&self, key: &Key) {
            let labels = key
                .labels()
                .map(|l| (l.key().to_string(), l.value().to_string()))
                .collect();
            self.keys
                .lock()
                .unwrap()
                .push((key.name().to_string(), labels));
        }
    }

    impl Recorder for KeyLog {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            self.push(key);
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            self.push(key);
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            self.push(key);
            Histogram::noop()
        }
    }

    #[test]
    fn test_request_labels() {
        let log = KeyLog::default();
        metrics::with_local_recorder(&log, || {
            record_request(502, "http://b:8080", Instant::now());
        });

        let keys = log.keys.lock().unwrap();
        assert_eq!(keys.len(), 2);

        let (name, labels) = &keys[0];
        assert_eq!(name, "proxy_requests_total");
        assert_eq!(
            labels,
            &[
                ("backend".to_string(), "http://b:8080".to_string()),
                ("status".to_string(), "502".to_string()),
            ]
        );

        let (name, labels) = &keys[1];
        assert_eq!(name, "proxy_request_duration_seconds");
        assert_eq!(labels, &[("backend".to_string(), "http://b:8080".to_string())]);
    }
}
