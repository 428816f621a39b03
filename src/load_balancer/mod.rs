//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → pool.rs (read comma-separated hosts → BackendList)
//!
//! per request
//!     → dispatcher.rs (select_backend)
//!         → round_robin.rs (atomic read-and-advance of the cursor)
//!     → backend.rs (parse address into ProxyTarget, rewrite URI)
//!     → forward over the shared HTTP client, stream response back
//! ```
//!
//! # Design Decisions
//! - BackendList is immutable after load and shared without locks
//! - The cursor is the only shared mutable state
//! - No health tracking: every backend stays in rotation

pub mod backend;
pub mod dispatcher;
pub mod pool;
pub mod round_robin;

pub use backend::ProxyTarget;
pub use dispatcher::Dispatcher;
pub use pool::{BackendList, EnvOverride, HostSource};
pub use round_robin::RoundRobin;
