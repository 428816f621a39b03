//! Backend pool loading.
//!
//! # Responsibilities
//! - Read the comma-separated host setting from a [`HostSource`]
//! - Produce the ordered, immutable [`BackendList`]
//! - Refuse to produce an empty pool
//!
//! Addresses are kept as written; parsing happens per request in
//! [`ProxyTarget`](crate::load_balancer::backend::ProxyTarget).

use std::ffi::OsString;
use std::ops::Deref;
use std::sync::Arc;

use crate::config::{ConfigError, PoolConfig};

/// Anything that can supply the raw backend host setting.
pub trait HostSource {
    /// Name of the setting, used in error messages.
    fn key(&self) -> &str;

    /// The raw comma-separated value, or `None` if the setting is absent.
    fn hosts_value(&self) -> Result<Option<String>, ConfigError>;
}

impl HostSource for PoolConfig {
    fn key(&self) -> &str {
        &self.env_key
    }

    fn hosts_value(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.hosts.clone())
    }
}

impl HostSource for str {
    fn key(&self) -> &str {
        "hosts"
    }

    fn hosts_value(&self) -> Result<Option<String>, ConfigError> {
        Ok(Some(self.to_string()))
    }
}

impl<S: HostSource + ?Sized> HostSource for &S {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn hosts_value(&self) -> Result<Option<String>, ConfigError> {
        (**self).hosts_value()
    }
}

/// A source where an environment variable wins over a fallback source.
///
/// Empty variables are treated as unset. A variable that is set but not valid
/// UTF-8 is an error, never a silent fallback.
#[derive(Debug, Clone)]
pub struct EnvOverride<S> {
    key: String,
    value: Option<OsString>,
    fallback: S,
}

impl<S: HostSource> EnvOverride<S> {
    /// Snapshot `key` from the process environment.
    pub fn from_env(key: impl Into<String>, fallback: S) -> Self {
        let key = key.into();
        let value = std::env::var_os(&key);
        Self::from_os(key, value, fallback)
    }

    /// Build with an explicit override value.
    pub fn new(key: impl Into<String>, value: Option<String>, fallback: S) -> Self {
        Self::from_os(key, value.map(OsString::from), fallback)
    }

    /// Build with a raw override value as read from the environment.
    pub fn from_os(key: impl Into<String>, value: Option<OsString>, fallback: S) -> Self {
        Self {
            key: key.into(),
            value: value.filter(|v| !v.is_empty()),
            fallback,
        }
    }
}

impl<S: HostSource> HostSource for EnvOverride<S> {
    fn key(&self) -> &str {
        &self.key
    }

    fn hosts_value(&self) -> Result<Option<String>, ConfigError> {
        match &self.value {
            Some(value) => value
                .to_str()
                .map(|v| Some(v.to_string()))
                .ok_or_else(|| ConfigError::UnreadableHosts {
                    key: self.key.clone(),
                }),
            None => self.fallback.hosts_value(),
        }
    }
}

/// Ordered, non-empty, immutable list of backend addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendList {
    hosts: Arc<[String]>,
}

impl BackendList {
    /// Build a list from addresses. Returns `None` when `hosts` is empty.
    pub fn new(hosts: Vec<String>) -> Option<Self> {
        if hosts.is_empty() {
            return None;
        }
        Some(Self {
            hosts: hosts.into(),
        })
    }

    /// Number of backends (always at least one).
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Deref for BackendList {
    type Target = [String];
    fn deref(&self) -> &Self::Target {
        &self.hosts
    }
}

/// Load the backend pool from `source`.
///
/// Splits on `,`, trims each segment, drops empty ones and keeps the order.
pub fn load<S: HostSource + ?Sized>(source: &S) -> Result<BackendList, ConfigError> {
    let key = source.key().to_string();
    let raw = source
        .hosts_value()?
        .ok_or_else(|| ConfigError::MissingHosts { key: key.clone() })?;

    let hosts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    let list = BackendList::new(hosts).ok_or(ConfigError::EmptyHosts { key })?;

    tracing::info!(
        backends = list.len(),
        hosts = ?&*list,
        "Backend pool loaded"
    );
    Ok(list)
}
