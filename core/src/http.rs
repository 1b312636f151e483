//! Request descriptor types.
//!
//! # Design
//! A `RequestDescriptor` is the plain-data description of one outgoing
//! request: where to connect, what to ask for, and with which verb. It is
//! built fresh for every call by the URL translator, handed by value to the
//! executor, and dropped once the request completes. Nothing in here touches
//! the network.

use std::fmt;
use std::str::FromStr;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method name is not one of the four supported verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Transport selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP over TCP.
    Plain,
    /// HTTPS: TLS over TCP.
    Secure,
}

impl Scheme {
    pub fn from_https_flag(use_https: bool) -> Self {
        if use_https {
            Scheme::Secure
        } else {
            Scheme::Plain
        }
    }

    /// Protocol string in the `"http:"` / `"https:"` form.
    pub fn protocol(&self) -> &'static str {
        match self {
            Scheme::Plain => "http:",
            Scheme::Secure => "https:",
        }
    }

    /// Well-known port the transport dials when a descriptor carries port 0.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Plain => 80,
            Scheme::Secure => 443,
        }
    }
}

/// Everything needed to issue one request.
///
/// `host` and `path` are empty when the source URL could not be parsed.
/// A `port` of 0 means the URL did not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub scheme: Scheme,
    pub method: HttpMethod,
}

impl RequestDescriptor {
    pub fn with_method(self, method: HttpMethod) -> Self {
        Self { method, ..self }
    }

    /// Value for the `Host` header.
    pub fn authority(&self) -> String {
        // IPv6 literals are stored bare and need their brackets back here.
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == 0 {
            host
        } else {
            format!("{host}:{}", self.port)
        }
    }

    /// Port the transport actually connects to.
    pub(crate) fn effective_port(&self) -> u16 {
        if self.port == 0 {
            self.scheme.default_port()
        } else {
            self.port
        }
    }

    /// Request target in origin form; an empty path becomes `/`.
    pub(crate) fn target(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }
}
