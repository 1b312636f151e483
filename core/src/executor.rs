//! Single request/response round trip.
//!
//! # Design
//! `make_http_request_with` is an `async fn`, so nothing touches the network
//! until the returned future is polled. Once polled it opens one exchange on
//! the transport, races the exchange's error and response events, and if the
//! response wins folds the body chunks, in the order they arrive, into one
//! string. Any failure drops whatever was accumulated so far.

use bytes::Bytes;
use futures::future::{self, Either};
use futures::TryStreamExt;

use crate::error::Result;
use crate::http::RequestDescriptor;
use crate::net::NetTransport;
use crate::transport::{Exchange, Transport};

/// Issue the request described by `options` over a fresh network connection
/// and resolve to the whole response body.
pub async fn make_http_request(options: RequestDescriptor, data: Option<&str>) -> Result<String> {
    make_http_request_with(&NetTransport::new(), options, data).await
}

/// Like [`make_http_request`], over the given transport.
pub async fn make_http_request_with<T: Transport>(
    transport: &T,
    options: RequestDescriptor,
    data: Option<&str>,
) -> Result<String> {
    let body = data.map(|data| Bytes::copy_from_slice(data.as_bytes()));
    let Exchange { response, error } = transport.open(&options, body);

    // Response goes first: if both are ready the response happened first.
    let chunks = match future::select(response, error).await {
        Either::Left((chunks, _)) => chunks,
        Either::Right((err, _)) => {
            log::debug!("{} {} failed: {err}", options.method, options.target());
            return Err(err);
        }
    };

    let accumulated = chunks
        .try_fold(Vec::new(), |mut acc: Vec<Bytes>, chunk| async move {
            acc.push(chunk);
            Ok(acc)
        })
        .await?;

    let body = String::from_utf8_lossy(&accumulated.concat()).into_owned();
    log::trace!(
        "{} {} drained {} chunks, {} bytes",
        options.method,
        options.target(),
        accumulated.len(),
        body.len()
    );
    Ok(body)
}
