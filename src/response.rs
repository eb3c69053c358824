//! The response sink handlers write into, and a buffered implementation of it.
//!
//! A handler never builds a response value. It is handed a
//! [`ResponseWriter`] and commits a status, headers and body through it, in
//! that order, exactly as it would on a raw HTTP connection. That is what lets
//! middleware sit between the handler and the connection and observe what
//! passes by.

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// A sink for one HTTP response.
///
/// The contract mirrors the wire: the status line is committed once, either
/// explicitly through [`write_header`](ResponseWriter::write_header) or
/// implicitly as `200 OK` by the first [`write`](ResponseWriter::write).
/// Header edits after the status is committed have no effect on what is sent.
pub trait ResponseWriter {
    /// Header map that will be sent with the response.
    fn headers(&mut self) -> &mut HeaderMap;

    /// Commits the status line.
    fn write_header(&mut self, status: StatusCode);

    /// Appends to the body, returning the number of bytes accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers(&mut self) -> &mut HeaderMap {
        (**self).headers()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }
}

// ── Recorder ──────────────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that buffers the whole response in memory.
///
/// [`Server`](crate::Server) serves every request into a fresh `Recorder` and
/// converts it with [`into_response`](Recorder::into_response) afterwards. It
/// is equally useful in tests:
///
/// ```rust
/// use tsu_middleware::{Recorder, ResponseWriter};
/// use http::StatusCode;
///
/// let mut rec = Recorder::new();
/// rec.write_header(StatusCode::CREATED);
/// rec.write(b"done").unwrap();
/// rec.write_header(StatusCode::CONFLICT); // already committed, ignored
///
/// assert_eq!(rec.status(), StatusCode::CREATED);
/// assert_eq!(rec.body(), b"done".as_slice());
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    // Snapshot taken when the status is committed; later edits are ignored.
    sent_headers: Option<HeaderMap>,
    body: BytesMut,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, or `200 OK` if nothing was committed yet.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a status line has been committed.
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Headers as they were when the status was committed, or the live map
    /// if it was not committed yet.
    pub fn sent_headers(&self) -> &HeaderMap {
        self.sent_headers.as_ref().unwrap_or(&self.headers)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the recorded output into a response hyper can send.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let status = self.status();
        let headers = self.sent_headers.unwrap_or(self.headers);
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = headers;
        res
    }

    fn commit(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
            self.sent_headers = Some(self.headers.clone());
        }
    }
}

impl ResponseWriter for Recorder {
    fn headers(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        self.commit(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.commit(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
