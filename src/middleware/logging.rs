//! Access logging: one line per request.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tracing::warn;

use super::capture::StatusCapturingResponse;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;

/// Writes `<status> <path> <duration>\n` to `out` after every request.
///
/// ```text
/// 200 /about/ 41.3µs
/// 404 /missing 12.9µs
/// ```
///
/// The status is the first one the inner handler committed (see
/// [`StatusCapturingResponse`]); the duration is wall-clock time spent in the
/// inner handler. `out` is locked for the length of one line, so concurrent
/// requests never interleave mid-line, and nothing is buffered beyond what
/// `out` buffers itself.
///
/// Panics from the inner handler are not caught here. They unwind straight
/// through, and no line is written for that request. Put
/// [`PanicRecoveryMiddleware`](super::PanicRecoveryMiddleware) *inside* this
/// layer to have failed requests logged as 500s.
pub struct LoggingMiddleware<W> {
    out: Mutex<W>,
    inner: BoxedHandler,
}

impl<W: Write + Send + 'static> LoggingMiddleware<W> {
    pub fn new(out: W, inner: BoxedHandler) -> Self {
        Self { out: Mutex::new(out), inner }
    }
}

impl<W: Write + Send + 'static> Handler for LoggingMiddleware<W> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let mut capture = StatusCapturingResponse::new(w);
        let start = Instant::now();
        self.inner.serve(&mut capture, req);
        let elapsed = start.elapsed();

        let line = format!("{} {} {:?}\n", capture.status().as_u16(), req.path(), elapsed);
        // A poisoned sink only means another request panicked mid-write.
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.write_all(line.as_bytes()) {
            warn!(path = req.path(), "access log write failed: {e}");
        }
    }
}
