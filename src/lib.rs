//! # tsu-middleware
//!
//! Composable HTTP middleware, and a registry to compose it by name.
//!
//! ## The contract
//!
//! A handler is anything that answers a [`Request`] by writing into a
//! [`ResponseWriter`]. A middleware is a handler wrapping another handler.
//! This crate ships two of them and the plumbing to chain them:
//!
//! - [`LoggingMiddleware`]: one `<status> <path> <duration>` line per request,
//!   with the status caught on the way through by [`StatusCapturingResponse`]
//! - [`PanicRecoveryMiddleware`]: a panicking handler becomes a `500`, the
//!   process keeps serving
//! - [`Registry`]: string keys to middleware [`Constructor`]s, so a chain can
//!   come from configuration instead of code
//!
//! Routing, TLS and business logic are not here. Bring your own handler; the
//! bundled [`Server`] only puts a finished chain on a socket.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use http::StatusCode;
//! use tsu_middleware::{Handler, Registry, Request, ResponseWriter, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(Registry::with_defaults());
//!
//!     // Outermost first: log every request, including recovered panics.
//!     let app = registry
//!         .compose(["middleware.LoggingStdOut", "middleware.Panic"], hello.into_boxed_handler())
//!         .unwrap();
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! fn hello(w: &mut dyn ResponseWriter, req: &Request) {
//!     if req.path() != "/" {
//!         w.write_header(StatusCode::NOT_FOUND);
//!         return;
//!     }
//!     let _ = w.write(b"hello");
//! }
//! ```

mod error;
mod handler;
mod registry;
mod request;
mod response;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use middleware::{
    Constructor, LoggingMiddleware, PanicRecoveryMiddleware, StatusCapturingResponse,
};
pub use registry::{Registry, parse_chain};
pub use request::Request;
pub use response::{Recorder, ResponseWriter};
pub use server::Server;
