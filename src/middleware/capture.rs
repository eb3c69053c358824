//! Status capture for response sinks.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// A [`ResponseWriter`] proxy that remembers the first status committed
/// through it.
///
/// Sinks are not required to say what they sent, so anything that needs the
/// final status of a request (access logs, metrics) has to catch it on the
/// way through. The first commit wins, explicit or implied by a body write,
/// the same way a real connection can only send its status line once.
/// Every call is still forwarded unchanged: the wrapper never hides a repeated
/// `write_header` from the sink underneath, it only refuses to update its own
/// cached value.
///
/// Create one per request. It borrows the request's sink, so it cannot
/// outlive or be shared across requests.
pub struct StatusCapturingResponse<W> {
    wrapped: W,
    status: Option<StatusCode>,
}

impl<W: ResponseWriter> StatusCapturingResponse<W> {
    pub fn new(wrapped: W) -> Self {
        Self { wrapped, status: None }
    }

    /// The first status committed, or `200 OK` if none was.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    fn record(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }
}

impl<W: ResponseWriter> ResponseWriter for StatusCapturingResponse<W> {
    fn headers(&mut self) -> &mut HeaderMap {
        self.wrapped.headers()
    }

    fn write_header(&mut self, status: StatusCode) {
        self.record(status);
        self.wrapped.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A body write on an uncommitted response implies 200.
        self.record(StatusCode::OK);
        self.wrapped.write(buf)
    }
}
