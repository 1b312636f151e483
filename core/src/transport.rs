//! The seam between the executor and the thing that actually talks to the
//! network.
//!
//! # Design
//! Opening a request yields an `Exchange`: two independent terminal event
//! sources, one that fires when the connection fails and one that fires when
//! the response head arrives carrying the body as a chunk stream. The
//! executor races the two; a transport only has to make sure every failure
//! before the response ends up on the error side.
//!
//! `NetTransport` (see `net`) is the real implementation. Tests build
//! `Exchange`s by hand from `futures` combinators, or wrap a real one after
//! taking it apart with `Exchange::into_parts`.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream, StreamExt};
use futures::FutureExt;

use crate::error::{Error, Result};
use crate::http::RequestDescriptor;

/// Response body as an ordered stream of chunks.
pub type BodyChunks = BoxStream<'static, Result<Bytes>>;

/// One in-flight request and its two terminal events.
pub struct Exchange {
    pub(crate) response: BoxFuture<'static, BodyChunks>,
    pub(crate) error: BoxFuture<'static, Error>,
}

impl Exchange {
    /// `response` resolves when the response head arrives; `error` resolves
    /// when the connection fails. Either may stay pending forever.
    pub fn new<R, E>(response: R, error: E) -> Self
    where
        R: std::future::Future<Output = BodyChunks> + Send + 'static,
        E: std::future::Future<Output = Error> + Send + 'static,
    {
        Self {
            response: response.boxed(),
            error: error.boxed(),
        }
    }

    /// Take the two events apart, for transports that wrap another one.
    pub fn into_parts(self) -> (BoxFuture<'static, BodyChunks>, BoxFuture<'static, Error>) {
        (self.response, self.error)
    }
}

/// Something that can put a request on the wire.
pub trait Transport: Send + Sync {
    /// Start the request described by `descriptor`, sending `body` when
    /// present and then ending the request.
    fn open(&self, descriptor: &RequestDescriptor, body: Option<Bytes>) -> Exchange;
}

/// Aborts a background task when dropped.
pub(crate) struct AbortOnDrop(pub(crate) tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Body stream that keeps the connection driver alive until the body is
/// dropped.
pub(crate) struct Guarded {
    pub(crate) inner: BodyChunks,
    pub(crate) _driver: AbortOnDrop,
}

impl Stream for Guarded {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}
