//! Error taxonomy for the proxy.
//!
//! `Configuration` errors are process-scoped and stop startup. Every other
//! variant is request-scoped and is turned into a response for the one caller
//! that hit it (see `http::response`).

use crate::config::loader::ConfigError;

/// Errors produced while starting or running the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The backend pool could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A selected backend address is not a usable endpoint.
    #[error("cannot route to backend {address:?}: {reason}")]
    Routing { address: String, reason: String },

    /// The exchange with the selected backend failed.
    #[error("backend {backend} unavailable: {source}")]
    UpstreamUnavailable {
        backend: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Listener or serve loop I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    pub(crate) fn routing(address: &str, reason: impl Into<String>) -> Self {
        ProxyError::Routing {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
