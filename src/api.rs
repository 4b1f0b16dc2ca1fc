//! One-shot convenience entry points.
//!
//! Each function builds a throwaway [`Connection`] with an empty base prefix,
//! applies the `Content-Type` header when the verb carries a body, performs
//! the single call, and lets the connection drop. `url` must therefore be a
//! full absolute URL. Callers making more than one request to the same host
//! should hold their own `Connection` instead.
//!
//! A `ctype` string that is not a valid header value cannot be sent; it
//! degrades to a sentinel [`Response`] carrying the configuration error as
//! the diagnostic body, the same shape a transport failure takes.

use crate::connection::Connection;
use crate::form::FormData;
use crate::response::Response;

pub fn get(url: &str) -> Response {
    let mut conn = Connection::new("");
    conn.get(url)
}

pub fn post(url: &str, ctype: &str, data: &str) -> Response {
    let mut conn = Connection::new("");
    if let Err(err) = conn.append_header("Content-Type", ctype) {
        return Response::failure(err);
    }
    conn.post(url, data)
}

/// Multipart form POST. Consumes the form; build a fresh one per call.
pub fn post_form(url: &str, form: FormData) -> Response {
    let mut conn = Connection::new("");
    conn.post_form(url, form)
}

pub fn put(url: &str, ctype: &str, data: &str) -> Response {
    let mut conn = Connection::new("");
    if let Err(err) = conn.append_header("Content-Type", ctype) {
        return Response::failure(err);
    }
    conn.put(url, data)
}

pub fn patch(url: &str, ctype: &str, data: &str) -> Response {
    let mut conn = Connection::new("");
    if let Err(err) = conn.append_header("Content-Type", ctype) {
        return Response::failure(err);
    }
    conn.patch(url, data)
}

pub fn del(url: &str) -> Response {
    let mut conn = Connection::new("");
    conn.del(url)
}

pub fn head(url: &str) -> Response {
    let mut conn = Connection::new("");
    conn.head(url)
}

pub fn options(url: &str) -> Response {
    let mut conn = Connection::new("");
    conn.options(url)
}
