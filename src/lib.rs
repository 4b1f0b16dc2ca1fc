//! restcall, a small blocking REST client.
//!
//! The center of the crate is [`Connection`]: configure it once (headers,
//! timeouts, auth, proxy, TLS and redirect policy), then issue any number of
//! sequential requests against it, one method per HTTP verb. For one-off
//! calls the free functions in [`api`] wrap a throwaway connection.
//!
//! ```no_run
//! use restcall::Connection;
//!
//! let mut conn = Connection::new("https://api.example.com");
//! conn.append_header("Accept", "application/json").unwrap();
//! conn.set_timeout(Some(std::time::Duration::from_secs(10)));
//!
//! let resp = conn.get("/widgets/42");
//! if resp.is_transport_error() {
//!     eprintln!("could not reach the server: {}", resp.text());
//! } else {
//!     println!("{resp}");
//! }
//! ```
//!
//! Before issuing requests from multiple threads, call [`init`]; after the
//! last request has completed, call [`disable`]. See [`global`] for the
//! exact rules.

pub mod api;
pub mod connection;
pub mod errors;
pub mod form;
pub mod global;
pub mod headers;
pub mod response;

pub use api::{del, get, head, options, patch, post, post_form, put};
pub use connection::{Auth, AuthScheme, Connection, RequestInfo, DEFAULT_MAX_REDIRECTS};
pub use errors::Error;
pub use form::{FormData, FormPart};
pub use global::{disable, init, is_initialized};
pub use headers::Headers;
pub use response::{Response, TRANSPORT_ERROR};
