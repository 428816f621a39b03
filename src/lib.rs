//! Round-robin HTTP proxy library.
//!
//! Every inbound request is forwarded to exactly one backend from a fixed
//! pool, taken in strict rotation.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::{RunningProxy, Shutdown};
pub use load_balancer::{BackendList, Dispatcher};
