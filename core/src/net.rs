//! Network transport: one fresh TCP (optionally TLS) connection per request,
//! HTTP/1.1 spoken by hyper's single-connection client.
//!
//! # Design
//! hyper splits a client connection into a `SendRequest` handle and a
//! connection future that must be polled to move bytes. The connection future
//! runs on its own task; if it fails, the failure is pushed onto the
//! exchange's error channel. Connect, TLS and handshake failures go to the
//! same channel, so the executor sees every pre-response failure as the error
//! event. The driver task lives inside the returned body stream and is
//! aborted when the body is dropped.

use std::sync::Arc;

use bytes::Bytes;
use futures::future;
use futures::stream::{StreamExt, TryStreamExt};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper::header::{CONTENT_LENGTH, HOST};
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{self, ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::error::{Error, Result};
use crate::http::{RequestDescriptor, Scheme};
use crate::transport::{AbortOnDrop, BodyChunks, Exchange, Guarded, Transport};

/// Opens a new connection for every request. Nothing is pooled or reused.
#[derive(Debug, Clone, Default)]
pub struct NetTransport {
    tls: Option<Arc<ClientConfig>>,
}

impl NetTransport {
    /// Transport trusting the webpki root certificates for HTTPS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport using a caller-supplied rustls configuration for HTTPS.
    pub fn with_tls_config(config: Arc<ClientConfig>) -> Self {
        Self { tls: Some(config) }
    }
}

impl Transport for NetTransport {
    fn open(&self, descriptor: &RequestDescriptor, body: Option<Bytes>) -> Exchange {
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<Error>();
        let descriptor = descriptor.clone();
        let transport = self.clone();

        let response = async move {
            match transport.send(&descriptor, body, error_tx.clone()).await {
                Ok(chunks) => chunks,
                Err(err) => {
                    let _ = error_tx.send(err);
                    future::pending().await
                }
            }
        };
        let error = async move {
            match error_rx.recv().await {
                Some(err) => err,
                // Every sender is gone only after the response was delivered.
                None => future::pending().await,
            }
        };

        Exchange::new(response, error)
    }
}

impl NetTransport {
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
        body: Option<Bytes>,
        errors: mpsc::UnboundedSender<Error>,
    ) -> Result<BodyChunks> {
        if descriptor.host.is_empty() {
            return Err(Error::connection("request has no host"));
        }

        let port = descriptor.effective_port();
        log::debug!(
            "connecting to {}//{}:{port}",
            descriptor.scheme.protocol(),
            descriptor.host
        );
        let tcp = TcpStream::connect((descriptor.host.as_str(), port))
            .await
            .map_err(Error::connection)?;

        match descriptor.scheme {
            Scheme::Plain => self.exchange(tcp, descriptor, body, errors).await,
            Scheme::Secure => {
                let config = match &self.tls {
                    Some(config) => config.clone(),
                    None => Arc::new(default_tls_config()?),
                };
                let server_name =
                    ServerName::try_from(descriptor.host.clone()).map_err(Error::connection)?;
                let tls = TlsConnector::from(config)
                    .connect(server_name, tcp)
                    .await
                    .map_err(Error::connection)?;
                self.exchange(tls, descriptor, body, errors).await
            }
        }
    }

    async fn exchange<I>(
        &self,
        io: I,
        descriptor: &RequestDescriptor,
        body: Option<Bytes>,
        errors: mpsc::UnboundedSender<Error>,
    ) -> Result<BodyChunks>
    where
        I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, conn) = http1::handshake::<_, Full<Bytes>>(TokioIo::new(io))
            .await
            .map_err(Error::connection)?;

        let driver = AbortOnDrop(tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::debug!("connection closed with error: {err}");
                let _ = errors.send(Error::connection(err));
            }
        }));

        let mut request = Request::builder()
            .method(descriptor.method.as_str())
            .uri(descriptor.target())
            .header(HOST, descriptor.authority());
        if let Some(body) = &body {
            request = request.header(CONTENT_LENGTH, body.len().to_string());
        }
        let request = request
            .body(Full::new(body.unwrap_or_default()))
            .map_err(Error::connection)?;

        let response = sender.send_request(request).await.map_err(Error::connection)?;
        log::debug!(
            "{} {} answered {}",
            descriptor.method,
            descriptor.target(),
            response.status()
        );

        let chunks = response.into_body().into_data_stream();
        let chunks = TryStreamExt::map_err(chunks, Error::stream).boxed();
        Ok(Guarded {
            inner: chunks,
            _driver: driver,
        }
        .boxed())
    }
}

fn default_tls_config() -> Result<ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(Error::connection)?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}
