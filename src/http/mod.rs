//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → load_balancer::Dispatcher (pick backend, forward)
//!     → request.rs (X-Forwarded-For, request ID lookup)
//!     → response.rs (hop-by-hop stripping, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_FORWARDED_FOR, X_REQUEST_ID};
pub use server::HttpServer;
