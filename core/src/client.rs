//! Verb helpers.
//!
//! # Design
//! Every helper is the same three steps: translate the URL into a
//! `RequestDescriptor`, stamp the verb on it, and hand it to the executor.
//! The `*_json` variants serialize the payload before sending and decode the
//! body after a successful round trip. `Client` holds only its transport and
//! carries no state between calls; the free functions at the bottom use a
//! default network client.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::executor::make_http_request_with;
use crate::http::HttpMethod;
use crate::net::NetTransport;
use crate::options::get_options_from_url_string;
use crate::transport::Transport;

/// Stateless request helper bound to a transport.
#[derive(Debug, Clone, Default)]
pub struct Client<T = NetTransport> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(
        &self,
        url: &str,
        method: HttpMethod,
        data: Option<&str>,
        use_https: bool,
    ) -> Result<String> {
        let options = get_options_from_url_string(url, use_https).with_method(method);
        make_http_request_with(&self.transport, options, data).await
    }

    pub async fn get(&self, url: &str, use_https: bool) -> Result<String> {
        self.send(url, HttpMethod::Get, None, use_https).await
    }

    pub async fn get_json<R: DeserializeOwned>(&self, url: &str, use_https: bool) -> Result<R> {
        let body = self.send(url, HttpMethod::Get, None, use_https).await?;
        decode(&body)
    }

    pub async fn post(&self, url: &str, data: &str, use_https: bool) -> Result<String> {
        self.send(url, HttpMethod::Post, Some(data), use_https).await
    }

    pub async fn post_json<R, D>(&self, url: &str, data: &D, use_https: bool) -> Result<R>
    where
        R: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let payload = encode(data)?;
        let body = self.send(url, HttpMethod::Post, Some(payload.as_str()), use_https).await?;
        decode(&body)
    }

    pub async fn put(&self, url: &str, data: &str, use_https: bool) -> Result<String> {
        self.send(url, HttpMethod::Put, Some(data), use_https).await
    }

    pub async fn put_json<R, D>(&self, url: &str, data: &D, use_https: bool) -> Result<R>
    where
        R: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let payload = encode(data)?;
        let body = self.send(url, HttpMethod::Put, Some(payload.as_str()), use_https).await?;
        decode(&body)
    }

    /// DELETE, with an optional body.
    pub async fn delete_item(&self, url: &str, data: Option<&str>, use_https: bool) -> Result<String> {
        self.send(url, HttpMethod::Delete, data, use_https).await
    }
}

fn encode<D: Serialize + ?Sized>(data: &D) -> Result<String> {
    serde_json::to_string(data).map_err(|e| Error::SerializationError(e.to_string()))
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| Error::DeserializationError(e.to_string()))
}

/// GET `url` and return the body.
pub async fn get(url: &str, use_https: bool) -> Result<String> {
    Client::<NetTransport>::default().get(url, use_https).await
}

/// GET `url` and decode the body as JSON.
pub async fn get_json<R: DeserializeOwned>(url: &str, use_https: bool) -> Result<R> {
    Client::<NetTransport>::default().get_json(url, use_https).await
}

/// POST `data` verbatim and return the body.
pub async fn post(url: &str, data: &str, use_https: bool) -> Result<String> {
    Client::<NetTransport>::default().post(url, data, use_https).await
}

/// POST `data` as JSON and decode the JSON reply.
pub async fn post_json<R, D>(url: &str, data: &D, use_https: bool) -> Result<R>
where
    R: DeserializeOwned,
    D: Serialize + ?Sized,
{
    Client::<NetTransport>::default().post_json(url, data, use_https).await
}

/// PUT `data` verbatim and return the body.
pub async fn put(url: &str, data: &str, use_https: bool) -> Result<String> {
    Client::<NetTransport>::default().put(url, data, use_https).await
}

/// PUT `data` as JSON and decode the JSON reply.
pub async fn put_json<R, D>(url: &str, data: &D, use_https: bool) -> Result<R>
where
    R: DeserializeOwned,
    D: Serialize + ?Sized,
{
    Client::<NetTransport>::default().put_json(url, data, use_https).await
}

/// DELETE `url`, sending `data` when given, and return the body.
pub async fn delete_item(url: &str, data: Option<&str>, use_https: bool) -> Result<String> {
    Client::<NetTransport>::default().delete_item(url, data, use_https).await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use bytes::Bytes;
    use futures::future;
    use futures::stream::{self, StreamExt};
    use serde::Deserialize;

    use super::*;
    use crate::http::{RequestDescriptor, Scheme};
    use crate::transport::{BodyChunks, Exchange};

    /// Answers every request with a fixed body, or with the request body when
    /// `reply` is `None`, and records what it was asked to send.
    struct Recorder {
        reply: Option<&'static str>,
        seen: Mutex<Vec<(RequestDescriptor, Option<String>)>>,
    }

    impl Recorder {
        fn replying(reply: &'static str) -> Client<Recorder> {
            Client::new(Recorder {
                reply: Some(reply),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn echoing() -> Client<Recorder> {
            Client::new(Recorder {
                reply: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> (RequestDescriptor, Option<String>) {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Recorder {
        fn open(&self, descriptor: &RequestDescriptor, body: Option<Bytes>) -> Exchange {
            let text = body.as_ref().map(|b| String::from_utf8_lossy(b).into_owned());
            self.seen.lock().unwrap().push((descriptor.clone(), text));
            let reply = match self.reply {
                Some(reply) => Bytes::from_static(reply.as_bytes()),
                None => body.unwrap_or_default(),
            };
            let chunks: BodyChunks = stream::iter(vec![Ok(reply)]).boxed();
            Exchange::new(future::ready(chunks), future::pending())
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[tokio::test]
    async fn get_sets_method_and_sends_no_body() {
        let client = Recorder::replying("hi");
        assert_eq!(client.get("http://example.test/a", false).await.unwrap(), "hi");
        let (descriptor, body) = client.transport().last();
        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.path, "/a");
        assert_eq!(descriptor.scheme, Scheme::Plain);
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn get_json_decodes_body() {
        let client = Recorder::replying(r#"{"x":1,"y":2}"#);
        let point: Point = client.get_json("http://example.test/p", true).await.unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
        assert_eq!(client.transport().last().0.scheme, Scheme::Secure);
    }

    #[tokio::test]
    async fn get_json_bad_json() {
        let client = Recorder::replying("not json");
        let err = client
            .get_json::<Point>("http://example.test/p", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeserializationError(_)));
    }

    #[tokio::test]
    async fn post_and_put_pass_body_through() {
        let client = Recorder::echoing();
        assert_eq!(client.post("http://example.test/", "a=b", false).await.unwrap(), "a=b");
        assert_eq!(client.transport().last().0.method, HttpMethod::Post);
        assert_eq!(client.put("http://example.test/", "c=d", false).await.unwrap(), "c=d");
        let (descriptor, body) = client.transport().last();
        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(body.as_deref(), Some("c=d"));
    }

    #[tokio::test]
    async fn post_json_roundtrips_through_echo() {
        let client = Recorder::echoing();
        let sent = Point { x: -3, y: 7 };
        let back: Point = client.post_json("http://example.test/", &sent, false).await.unwrap();
        assert_eq!(back, sent);

        let (descriptor, body) = client.transport().last();
        assert_eq!(descriptor.method, HttpMethod::Post);
        let raw: serde_json::Value = serde_json::from_str(body.as_deref().unwrap()).unwrap();
        assert_eq!(raw["x"], -3);
    }

    #[tokio::test]
    async fn put_json_sends_put() {
        let client = Recorder::echoing();
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), vec![1, 2, 3]);
        let back: BTreeMap<String, Vec<i32>> =
            client.put_json("http://example.test/", &map, false).await.unwrap();
        assert_eq!(back, map);
        assert_eq!(client.transport().last().0.method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn unserializable_payload_is_not_sent() {
        let client = Recorder::echoing();
        let mut map = BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON object keys");
        let err = client
            .post_json::<serde_json::Value, _>("http://example.test/", &map, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
        assert!(client.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_with_and_without_body() {
        let client = Recorder::replying("");
        client.delete_item("http://example.test/items/1", None, false).await.unwrap();
        let (descriptor, body) = client.transport().last();
        assert_eq!(descriptor.method, HttpMethod::Delete);
        assert!(body.is_none());

        client
            .delete_item("http://example.test/items/1", Some("why"), false)
            .await
            .unwrap();
        assert_eq!(client.transport().last().1.as_deref(), Some("why"));
    }
}
