//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and HTTP server produce:
//!     → logging.rs (structured log events, one per routed request)
//!     → metrics.rs (counters, histograms per backend)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
