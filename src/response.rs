//! Buffered HTTP response model.
//!
//! A `Response` is the result of one completed (or failed) transaction. It is
//! fully buffered: status code, response headers, and raw body bytes, with no
//! streaming and no further parsing.
//!
//! Transport-level failures (DNS, connection refused, TLS, timeout) are *not*
//! errors at this layer. They come back as a `Response` whose `code` is the
//! [`TRANSPORT_ERROR`] sentinel, outside the 100-599 HTTP range, with a
//! diagnostic message in the body. HTTP 4xx/5xx are ordinary responses;
//! interpreting status codes is the caller's job.

use std::borrow::Cow;
use std::fmt;

use crate::headers::Headers;

/// Status code reported when the transport engine could not complete the
/// transaction at all. Deliberately outside the valid HTTP range.
pub const TRANSPORT_ERROR: i32 = -1;

#[derive(Debug, Clone, Default)]
pub struct Response {
    /// HTTP status code, or [`TRANSPORT_ERROR`] on transport failure.
    pub code: i32,

    /// Raw response body bytes. Convert to text with [`Response::text`] or
    /// parse according to the `Content-Type`. Holds a diagnostic message when
    /// `code` is [`TRANSPORT_ERROR`].
    pub body: Vec<u8>,

    /// Response headers in wire order. Repeated fields are kept as separate
    /// entries; [`Headers::get`] returns the first.
    pub headers: Headers,
}

impl Response {
    /// A sentinel response for a transaction that never produced an HTTP
    /// status. `message` ends up in the body as the diagnostic.
    pub(crate) fn failure(message: impl fmt::Display) -> Self {
        Response {
            code: TRANSPORT_ERROR,
            body: message.to_string().into_bytes(),
            headers: Headers::new(),
        }
    }

    /// True when `code` lies outside the 100-599 HTTP status range.
    pub fn is_transport_error(&self) -> bool {
        !(100..=599).contains(&self.code)
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// First value of the named response header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transport_error() {
            write!(f, "transport failure ({})", self.text())
        } else {
            write!(
                f,
                "HTTP {} ({} headers, {} body bytes)",
                self.code,
                self.headers.len(),
                self.body.len()
            )
        }
    }
}
