//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! Middleware wraps handlers of arbitrary concrete types, and the registry
//! hands out constructors that accept *any* handler. Both need one uniform
//! type, so every handler is erased behind `dyn Handler` and shared as a
//! [`BoxedHandler`]:
//!
//! ```text
//! fn hello(w: &mut dyn ResponseWriter, req: &Request) { … }  ← user writes this
//!        ↓ hello.into_boxed_handler()
//! Arc::new(hello)                                           ← BoxedHandler
//!        ↓ constructor.apply(handler)
//! Arc::new(LoggingMiddleware { inner: handler, … })         ← still a BoxedHandler
//!        ↓
//! handler.serve(w, req)  at request time                    ← one vtable dispatch per layer
//! ```
//!
//! Handlers are synchronous. A handler blocks its worker for as long as it
//! runs; [`Server`](crate::Server) gives every request its own blocking task.

use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseWriter;

/// Something that answers a [`Request`] by writing into a [`ResponseWriter`].
///
/// Implemented automatically for every function or closure with the
/// signature:
///
/// ```text
/// Fn(&mut dyn ResponseWriter, &Request)
/// ```
///
/// Implement it by hand for handlers that carry their own state; every
/// middleware in this crate does.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request);

    /// Erases the concrete type so the handler can be wrapped or registered.
    fn into_boxed_handler(self) -> BoxedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

/// A type-erased handler shared across concurrent requests.
///
/// `Arc` because a composed chain is built once and then served from many
/// worker threads at the same time.
pub type BoxedHandler = Arc<dyn Handler>;

impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        self(w, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Recorder;
    use http::StatusCode;

    struct Fixed(StatusCode);

    impl Handler for Fixed {
        fn serve(&self, w: &mut dyn ResponseWriter, _req: &Request) {
            w.write_header(self.0);
        }
    }

    #[test]
    fn closures_are_handlers() {
        let handler = (|w: &mut dyn ResponseWriter, req: &Request| {
            let _ = w.write(req.path().as_bytes());
        })
        .into_boxed_handler();

        let mut rec = Recorder::new();
        handler.serve(&mut rec, &Request::get("/echo"));
        assert_eq!(rec.body(), b"/echo".as_slice());
    }

    #[test]
    fn structs_are_handlers() {
        let handler = Fixed(StatusCode::NO_CONTENT).into_boxed_handler();

        let mut rec = Recorder::new();
        handler.serve(&mut rec, &Request::get("/"));
        assert_eq!(rec.status(), StatusCode::NO_CONTENT);
    }
}
