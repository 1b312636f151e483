use std::io;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Pause between streamed chunks so each one is flushed on its own.
const CHUNK_GAP: Duration = Duration::from_millis(20);

/// What the server saw of a request, returned by the fallback route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub target: String,
    pub host: Option<String>,
    pub content_length: Option<String>,
    pub transfer_encoding: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/chunks", get(chunks))
        .route("/echo", any(echo))
        .route("/broken", get(broken))
        .route("/status/{code}", any(status))
        .fallback(inspect)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::debug!("mock server serving on {addr}");
    }
    axum::serve(listener, app()).await
}

fn paced(parts: Vec<Result<Bytes, io::Error>>) -> Body {
    let parts = stream::iter(parts).then(|part| async move {
        tokio::time::sleep(CHUNK_GAP).await;
        part
    });
    Body::from_stream(parts)
}

async fn chunks() -> ([(header::HeaderName, &'static str); 1], Body) {
    let body = paced(vec![
        Ok(Bytes::from_static(b"{\"x\":")),
        Ok(Bytes::from_static(b"1}")),
    ]);
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn echo(body: Bytes) -> Bytes {
    body
}

async fn broken() -> Body {
    paced(vec![
        Ok(Bytes::from_static(b"partial")),
        Err(io::Error::new(io::ErrorKind::Other, "upstream went away")),
    ])
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

async fn inspect(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<RequestRecord> {
    let header = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(RequestRecord {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        host: header(header::HOST),
        content_length: header(header::CONTENT_LENGTH),
        transfer_encoding: header(header::TRANSFER_ENCODING),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
