//! Middleware layer.
//!
//! A middleware is a handler that wraps another handler: it sees the request
//! before the inner handler does and sees everything the inner handler
//! writes. Middleware is built by a [`Constructor`], a function from the
//! handler being wrapped to the wrapping handler. Constructors are what the
//! [`Registry`](crate::Registry) stores, so chains can be assembled from
//! string keys.
//!
//! Built in:
//! - [`LoggingMiddleware`]: one `<status> <path> <duration>` line per request
//! - [`PanicRecoveryMiddleware`]: turns a panicking handler into a 500
//!
//! Layers compose by repeated application. The layer applied last is the
//! outermost one and runs first:
//!
//! ```rust
//! use tsu_middleware::middleware;
//! use tsu_middleware::{Handler, Request, ResponseWriter};
//!
//! fn hello(w: &mut dyn ResponseWriter, _req: &Request) {
//!     let _ = w.write(b"hello");
//! }
//!
//! // logging( recovery( hello ) )
//! let app = middleware::stdout_logging().apply(
//!     middleware::panic_recovery().apply(hello.into_boxed_handler()),
//! );
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};

mod capture;
mod logging;
mod recovery;

pub use capture::StatusCapturingResponse;
pub use logging::LoggingMiddleware;
pub use recovery::PanicRecoveryMiddleware;

/// Registry key of [`panic_recovery`].
pub const PANIC: &str = "middleware.Panic";
/// Registry key of [`stdout_logging`].
pub const LOGGING_STDOUT: &str = "middleware.LoggingStdOut";
/// Registry key of [`stderr_logging`].
pub const LOGGING_STDERR: &str = "middleware.LoggingStdErr";

// ── Constructor ───────────────────────────────────────────────────────────────

/// A middleware constructor: takes the handler to wrap, returns the wrapper.
///
/// Cheap to clone; clones share one function and compare equal under
/// [`Constructor::ptr_eq`].
#[derive(Clone)]
pub struct Constructor(Arc<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync>);

impl Constructor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps `inner`.
    pub fn apply(&self, inner: BoxedHandler) -> BoxedHandler {
        (self.0)(inner)
    }

    /// Whether both values are clones of the same constructor.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&Arc::as_ptr(&self.0)).finish()
    }
}

// ── Built-in constructors ─────────────────────────────────────────────────────

/// Wraps handlers in [`PanicRecoveryMiddleware`].
pub fn panic_recovery() -> Constructor {
    Constructor::new(|inner| PanicRecoveryMiddleware::new(inner).into_boxed_handler())
}

/// Wraps handlers in a [`LoggingMiddleware`] writing to standard output.
pub fn stdout_logging() -> Constructor {
    Constructor::new(|inner| LoggingMiddleware::new(io::stdout(), inner).into_boxed_handler())
}

/// Wraps handlers in a [`LoggingMiddleware`] writing to standard error.
pub fn stderr_logging() -> Constructor {
    Constructor::new(|inner| LoggingMiddleware::new(io::stderr(), inner).into_boxed_handler())
}
