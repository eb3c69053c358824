//! Panic containment.

use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;

/// Stops a panicking handler from taking anything else down with it.
///
/// The inner handler runs under [`std::panic::catch_unwind`]. If it panics
/// the panic is swallowed and `500 Internal Server Error` is written to the
/// response. Nothing the handler already wrote is undone: if it committed a
/// status before panicking, that status stands and the 500 is ignored by the
/// sink.
///
/// This layer does not log. Compose it under
/// [`LoggingMiddleware`](super::LoggingMiddleware) if failed requests should
/// show up in the access log.
///
/// Only unwinding panics can be caught; a binary built with `panic = "abort"`
/// still terminates.
pub struct PanicRecoveryMiddleware {
    inner: BoxedHandler,
}

impl PanicRecoveryMiddleware {
    pub fn new(inner: BoxedHandler) -> Self {
        Self { inner }
    }
}

impl Handler for PanicRecoveryMiddleware {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.inner.serve(&mut *w, req)));
        if outcome.is_err() {
            w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Recorder;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn bye_bye(_: &mut dyn ResponseWriter, _: &Request) {
        panic!("bye bye");
    }

    #[test]
    #[should_panic(expected = "bye bye")]
    fn unwrapped_handler_panics() {
        bye_bye(&mut Recorder::new(), &Request::get("/"));
    }

    #[test]
    fn panic_becomes_500() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let panicking = (move |w: &mut dyn ResponseWriter, req: &Request| {
            flag.store(true, Ordering::SeqCst);
            bye_bye(w, req);
        })
        .into_boxed_handler();

        let recovery = PanicRecoveryMiddleware::new(panicking);
        let mut rec = Recorder::new();
        recovery.serve(&mut rec, &Request::get("/"));

        assert!(called.load(Ordering::SeqCst));
        assert_eq!(rec.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn normal_completion_is_untouched() {
        let ok = (|w: &mut dyn ResponseWriter, _: &Request| {
            let _ = w.write(b"fine");
        })
        .into_boxed_handler();

        let mut rec = Recorder::new();
        PanicRecoveryMiddleware::new(ok).serve(&mut rec, &Request::get("/"));

        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"fine".as_slice());
    }

    #[test]
    fn committed_status_survives_a_late_panic() {
        let late = (|w: &mut dyn ResponseWriter, req: &Request| {
            w.write_header(StatusCode::ACCEPTED);
            bye_bye(w, req);
        })
        .into_boxed_handler();

        let mut rec = Recorder::new();
        PanicRecoveryMiddleware::new(late).serve(&mut rec, &Request::get("/"));
        assert_eq!(rec.status(), StatusCode::ACCEPTED);
    }
}
