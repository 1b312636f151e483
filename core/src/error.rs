//! Error types for the request helpers.
//!
//! # Design
//! Network failures keep their original cause behind `source()` so callers can
//! downcast to `std::io::Error` or `hyper::Error` when they need to. Whether
//! the failure happened before or after the response head arrived decides
//! between `ConnectionError` and `StreamError`. JSON failures carry the
//! `serde_json` message only.

use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the request executor and verb helpers.
#[derive(Debug)]
pub enum Error {
    /// The connection failed before a response arrived (DNS, refused, reset,
    /// TLS handshake, unusable host).
    ConnectionError(BoxError),

    /// The response body stream failed while it was being drained.
    StreamError(BoxError),

    /// The response body could not be decoded as the expected JSON type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl Error {
    pub fn connection(cause: impl Into<BoxError>) -> Self {
        Error::ConnectionError(cause.into())
    }

    pub fn stream(cause: impl Into<BoxError>) -> Self {
        Error::StreamError(cause.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConnectionError(cause) => write!(f, "connection failed: {cause}"),
            Error::StreamError(cause) => write!(f, "response stream failed: {cause}"),
            Error::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            Error::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConnectionError(cause) | Error::StreamError(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn connection_error_keeps_io_cause() {
        let err = Error::connection(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        let io_err = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn json_errors_have_no_source() {
        let err = Error::DeserializationError("expected value".to_string());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "deserialization failed: expected value");
    }
}
