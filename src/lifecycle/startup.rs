//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the backend pool (fatal on failure)
//! - Build the dispatcher and HTTP server
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: nothing binds if the pool cannot be loaded
//! - The listener starts last (traffic only when ready)

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::load_balancer::pool::{self, HostSource};

/// A proxy that is accepting and routing requests.
#[derive(Debug)]
pub struct RunningProxy {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningProxy {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, drain in-flight requests and wait.
    pub async fn stop(self) -> Result<(), ProxyError> {
        self.shutdown.trigger();
        match self.task.await {
            Ok(result) => result.map_err(ProxyError::from),
            Err(e) => Err(ProxyError::Io(std::io::Error::other(e))),
        }
    }
}

/// Load the pool from `source`, bind `config.listener.bind_address` and serve.
pub async fn start<S>(config: ProxyConfig, source: &S) -> Result<RunningProxy, ProxyError>
where
    S: HostSource + ?Sized,
{
    let backends = pool::load(source)?;

    let server = HttpServer::new(&config, backends);
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let task = tokio::spawn(server.run(listener, receiver));

    tracing::info!(address = %local_addr, "Proxy serving");

    Ok(RunningProxy {
        local_addr,
        shutdown,
        task,
    })
}
