//! # Offerbook Server
//!
//! HTTP transport for the Offerbook API: route table, request extraction,
//! the offers handlers, response building, and the Hyper serve loop with
//! graceful shutdown.
//!
//! The domain pipeline itself lives in `offerbook-core`; this crate wires
//! it to HTTP. [`App`] is the in-memory dispatch path: it takes a buffered
//! [`RequestParts`] and produces a response, so the integration tests can
//! exercise every endpoint without opening a socket.

pub mod app;
pub mod config;
pub mod context;
pub mod extract;
pub mod logging;
pub mod offers;
pub mod response;
pub mod router;
pub mod server;
pub mod shutdown;

pub use app::App;
pub use config::{ServerConfig, ServerConfigBuilder};
pub use context::{RequestParts, RequestPartsBuilder};
pub use logging::{init_logging, LogConfig};
pub use router::{Params, RouteMatch, Router};
pub use server::{HttpResponse, Server, ServerError};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
