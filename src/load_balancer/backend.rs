//! Backend endpoint parsing.
//!
//! # Responsibilities
//! - Turn a configured address into a usable [`ProxyTarget`]
//! - Rewrite an inbound request URI onto the target
//!
//! Targets are derived per request and never cached, so a malformed entry only
//! fails the requests that land on it.

use axum::http::uri::{Authority, PathAndQuery, Scheme, Uri};
use url::Url;

use crate::error::ProxyError;

/// A parsed backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    authority: Authority,
    base_path: String,
    query: Option<String>,
}

impl ProxyTarget {
    /// Parse a backend address such as `http://10.0.0.5:8080/api`.
    pub fn parse(address: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(address).map_err(|e| ProxyError::routing(address, e.to_string()))?;

        match url.scheme() {
            "http" => {}
            "https" => {
                return Err(ProxyError::routing(
                    address,
                    "https backends are not supported, use an http address",
                ))
            }
            other => {
                return Err(ProxyError::routing(
                    address,
                    format!("unsupported scheme {:?}", other),
                ))
            }
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::routing(address, "missing host"))?;

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_maybe_shared(authority)
            .map_err(|e| ProxyError::routing(address, e.to_string()))?;

        Ok(Self {
            authority,
            base_path: url.path().to_string(),
            query: url.query().map(str::to_string),
        })
    }

    /// Point `inbound` at this target.
    ///
    /// The target's base path is joined to the inbound path with a single
    /// slash, and query strings from both sides are joined with `&`.
    pub fn rewrite(&self, inbound: &Uri) -> Result<Uri, ProxyError> {
        let path = join_paths(&self.base_path, inbound.path());
        let query = match (self.query.as_deref(), inbound.query()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some(format!("{}&{}", a, b)),
            (Some(a), _) if !a.is_empty() => Some(a.to_string()),
            (_, Some(b)) if !b.is_empty() => Some(b.to_string()),
            _ => None,
        };
        let path_and_query = match query {
            Some(q) => format!("{}?{}", path, q),
            None => path,
        };

        let path_and_query = PathAndQuery::from_maybe_shared(path_and_query)
            .map_err(|e| ProxyError::routing(self.authority.as_str(), e.to_string()))?;

        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ProxyError::routing(self.authority.as_str(), e.to_string()))
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}
