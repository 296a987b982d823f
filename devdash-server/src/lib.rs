//! Devdash HTTP surface
//!
//! The serving half of the dashboard: a thread-per-connection HTTP loop, the
//! request router that classifies paths and drives the build backend, the
//! directory listing generator, and the passthrough static responder.
//!
//! ```rust,ignore
//! use devdash_server::{Router, Server};
//! use devdash_config::BuildConfig;
//! use std::path::Path;
//!
//! let router = Router::new(Path::new("."), BuildConfig::default())?;
//! let server = Server::bind(("127.0.0.1", 8000), router)?;
//! server.run()?;
//! ```

mod assets;
mod error;
mod http;
mod listing;
mod pages;
mod router;

pub use error::ServeError;
pub use http::{percent_decode, Request, Response, Server};
pub use router::Router;
