//! Verb-named HTTP/HTTPS helpers that resolve to the whole response body.
//!
//! # Overview
//! `get`, `post`, `put`, `delete_item` and their `*_json` variants turn a URL
//! string into a `RequestDescriptor`, issue exactly one request over a fresh
//! connection, and resolve to the response body as a `String` (or a decoded
//! JSON value).
//!
//! # Design
//! - `options` translates URLs; the `use_https` flag, not the URL text,
//!   decides the scheme.
//! - `executor` races the connection's error and response events and drains
//!   the body in arrival order. It is the only part with async coordination.
//! - `transport` is the seam to the network; `net` implements it with tokio,
//!   hyper and rustls. No pooling, no retries, no status interpretation.
//! - All entry points are `async fn`s, so nothing is sent until awaited.

pub mod client;
pub mod error;
pub mod executor;
pub mod http;
pub mod net;
pub mod options;
pub mod transport;

pub use client::{delete_item, get, get_json, post, post_json, put, put_json, Client};
pub use error::{Error, Result};
pub use executor::{make_http_request, make_http_request_with};
pub use http::{HttpMethod, RequestDescriptor, Scheme};
pub use net::NetTransport;
pub use options::get_options_from_url_string;
pub use transport::{BodyChunks, Exchange, Transport};
