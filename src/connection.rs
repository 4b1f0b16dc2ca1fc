//! The reusable client connection.
//!
//! A `Connection` holds configuration shared across many requests (base URL
//! prefix, headers, timeouts, auth, proxy, TLS and redirect policy) and
//! exposes one method per HTTP verb. Every call is an independent,
//! synchronous transaction: the transport client is rebuilt from the current
//! configuration each time, so mutating the connection between calls always
//! takes effect on the next call and never on an earlier one.
//!
//! The target URL is `base_url + path`, concatenated verbatim. No
//! normalization, no percent-encoding, no slash deduplication. URL
//! construction is the caller's responsibility.
//!
//! Verb methods never fail at the type level: transport problems (DNS,
//! refused connection, TLS, timeout, unreadable form file, malformed URL)
//! come back as a [`Response`] carrying the
//! [`TRANSPORT_ERROR`](crate::response::TRANSPORT_ERROR) sentinel. Only
//! configuration setters return `Result`, and only the ones that validate
//! eagerly.
//!
//! A `Connection` is not meant for concurrent use; the verb methods take
//! `&mut self`, so sharing one across threads requires external locking.
//! Use one connection per concurrent caller instead.

use std::time::{Duration, Instant};

use http::header::{HeaderName, HeaderValue};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::{Method, Proxy};
use url::Url;

use crate::errors::Error;
use crate::form::FormData;
use crate::headers::Headers;
use crate::response::Response;

/// Redirect cap applied when following is enabled.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub scheme: AuthScheme,
    pub username: String,
    pub secret: String,
}

/// What the most recent call on a connection did, and how long it took.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub url: String,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Connection {
    base_url: String,
    headers: Headers,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    auth: Option<Auth>,
    proxy: Option<Url>,
    verify_peer: bool,
    follow_redirects: bool,
    max_redirects: usize,
    no_signal: bool,
    user_agent: String,
    last_request: Option<RequestInfo>,
}

enum Payload {
    None,
    Bytes(Vec<u8>),
    Form(FormData),
}

#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("{0}")]
    Engine(#[from] reqwest::Error),
    #[error("form file: {0}")]
    FormFile(#[from] std::io::Error),
}

impl Connection {
    /// A connection rooted at `base_url`. The empty string is a valid base
    /// (every path is then an absolute URL).
    pub fn new(base_url: impl Into<String>) -> Self {
        Connection {
            base_url: base_url.into(),
            headers: Headers::new(),
            timeout: None,
            connect_timeout: None,
            auth: None,
            proxy: None,
            verify_peer: true,
            follow_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            no_signal: false,
            user_agent: format!("restcall/{}", env!("CARGO_PKG_VERSION")),
            last_request: None,
        }
    }

    // ---------- configuration ----------

    /// Adds a header sent with every subsequent request, overwriting any
    /// existing header of the same name. Name and value are validated here;
    /// a bad header never reaches the wire.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        validate_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Replaces the whole header set. Validates every entry before touching
    /// the current set, so a rejected batch leaves the connection unchanged.
    pub fn set_headers(&mut self, headers: Headers) -> Result<(), Error> {
        for (name, value) in headers.iter() {
            validate_header(name, value)?;
        }
        self.headers = headers;
        Ok(())
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn clear_headers(&mut self) {
        self.headers.clear();
    }

    /// Overall per-request deadline. `None` (the default) means unbounded;
    /// production callers should always set one.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Deadline for establishing the connection only.
    pub fn set_connect_timeout(&mut self, timeout: Option<Duration>) {
        self.connect_timeout = timeout;
    }

    pub fn set_basic_auth(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.auth = Some(Auth {
            scheme: AuthScheme::Basic,
            username: username.into(),
            secret: password.into(),
        });
    }

    pub fn set_bearer_auth(&mut self, token: impl Into<String>) {
        self.auth = Some(Auth {
            scheme: AuthScheme::Bearer,
            username: String::new(),
            secret: token.into(),
        });
    }

    /// Routes all requests through `proxy_url`. The URL is parsed here, so a
    /// malformed proxy is reported at configuration time rather than at the
    /// first request.
    pub fn set_proxy(&mut self, proxy_url: &str) -> Result<(), Error> {
        let parsed = Url::parse(proxy_url).map_err(|source| Error::InvalidProxy {
            url: proxy_url.to_string(),
            source,
        })?;
        self.proxy = Some(parsed);
        Ok(())
    }

    pub fn proxy(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    /// TLS peer verification, on by default. Turning it off accepts any
    /// certificate; only do that against infrastructure you control.
    pub fn set_verify_peer(&mut self, verify: bool) {
        self.verify_peer = verify;
    }

    /// Redirect following, off by default. When on, at most
    /// [`DEFAULT_MAX_REDIRECTS`] hops are taken unless
    /// [`Connection::set_max_redirects`] says otherwise.
    pub fn set_follow_redirects(&mut self, follow: bool) {
        self.follow_redirects = follow;
    }

    pub fn set_max_redirects(&mut self, max: usize) {
        self.max_redirects = max;
    }

    /// Historically needed by transports whose resolvers abort long lookups
    /// with signals. The bundled engine is signal-free, so this only records
    /// the caller's intent.
    pub fn set_no_signal(&mut self, no_signal: bool) {
        self.no_signal = no_signal;
    }

    pub fn no_signal(&self) -> bool {
        self.no_signal
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Method, URL, and wall-clock duration of the most recent completed
    /// call, including ones that ended in a transport failure.
    pub fn last_request(&self) -> Option<&RequestInfo> {
        self.last_request.as_ref()
    }

    // ---------- verbs ----------

    pub fn get(&mut self, path: &str) -> Response {
        self.execute(Method::GET, path, Payload::None)
    }

    pub fn post(&mut self, path: &str, data: impl Into<Vec<u8>>) -> Response {
        self.execute(Method::POST, path, Payload::Bytes(data.into()))
    }

    /// Submits `form` as a `multipart/form-data` body. The transport engine
    /// picks the boundary and sets the `Content-Type` for this path; a
    /// caller-configured `Content-Type` header does not apply here. The form
    /// is consumed; build a fresh one per call.
    pub fn post_form(&mut self, path: &str, form: FormData) -> Response {
        self.execute(Method::POST, path, Payload::Form(form))
    }

    pub fn put(&mut self, path: &str, data: impl Into<Vec<u8>>) -> Response {
        self.execute(Method::PUT, path, Payload::Bytes(data.into()))
    }

    pub fn patch(&mut self, path: &str, data: impl Into<Vec<u8>>) -> Response {
        self.execute(Method::PATCH, path, Payload::Bytes(data.into()))
    }

    pub fn del(&mut self, path: &str) -> Response {
        self.execute(Method::DELETE, path, Payload::None)
    }

    /// The response body is always empty for HEAD, whatever the server sends.
    pub fn head(&mut self, path: &str) -> Response {
        self.execute(Method::HEAD, path, Payload::None)
    }

    /// Like GET with the OPTIONS method; many servers answer with an empty
    /// body, so don't count on one being present.
    pub fn options(&mut self, path: &str) -> Response {
        self.execute(Method::OPTIONS, path, Payload::None)
    }

    // ---------- execution ----------

    fn execute(&mut self, method: Method, path: &str, payload: Payload) -> Response {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let response = match self.dispatch(method.clone(), &url, payload) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("{method} {url} failed: {err}");
                Response::failure(err)
            }
        };

        log::debug!("{method} {url} -> {response}");
        self.last_request = Some(RequestInfo { method, url, duration: started.elapsed() });
        response
    }

    fn dispatch(&self, method: Method, url: &str, payload: Payload) -> Result<Response, TransportError> {
        let is_head = method == Method::HEAD;
        // the engine owns the multipart Content-Type; a configured one must
        // not reach the wire next to it, since header() appends rather than
        // replaces
        let form_payload = matches!(payload, Payload::Form(_));
        let client = self.build_client()?;
        let mut request = client.request(method, url);

        for (name, value) in self.headers.iter() {
            if form_payload && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            request = request.header(name, value);
        }
        if let Some(auth) = &self.auth {
            request = match auth.scheme {
                AuthScheme::Basic => request.basic_auth(&auth.username, Some(&auth.secret)),
                AuthScheme::Bearer => request.bearer_auth(&auth.secret),
            };
        }
        match payload {
            Payload::None => {}
            Payload::Bytes(data) => request = request.body(data),
            // the boundary-carrying Content-Type is set here by the engine;
            // configured Content-Type entries were filtered out above
            Payload::Form(form) => request = request.multipart(form.into_multipart()?),
        }

        let reply = request.send()?;
        let code = i32::from(reply.status().as_u16());

        let mut headers = Headers::new();
        for (name, value) in reply.headers() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        let body = if is_head { Vec::new() } else { reply.bytes()?.to_vec() };
        Ok(Response { code, body, headers })
    }

    /// A fresh engine client reflecting the configuration as of this call.
    fn build_client(&self) -> Result<Client, reqwest::Error> {
        let redirects = if self.follow_redirects {
            Policy::limited(self.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .redirect(redirects)
            .danger_accept_invalid_certs(!self.verify_peer)
            .user_agent(self.user_agent.clone());

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(Proxy::all(proxy.clone())?);
        }

        builder.build()
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), Error> {
    HeaderName::try_from(name).map_err(|err| Error::InvalidHeader {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    HeaderValue::try_from(value).map_err(|err| Error::InvalidHeader {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}
