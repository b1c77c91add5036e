//! The fully assembled outbound request.
//!
//! [`BuiltRequest`] wraps an `http::Request<Option<Bytes>>`. It is built once
//! per call, never mutated afterwards and handed by value to a transport.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

/// An immutable, ready to send HTTP request.
#[derive(Debug)]
pub struct BuiltRequest {
    inner: Request<Option<Bytes>>,
}

impl AsRef<Request<Option<Bytes>>> for BuiltRequest {
    fn as_ref(&self) -> &Request<Option<Bytes>> {
        &self.inner
    }
}

impl BuiltRequest {
    /// Consumes the request and returns the inner `http::Request`.
    pub fn into_inner(self) -> Request<Option<Bytes>> {
        self.inner
    }

    /// Splits the request into its head and optional body.
    pub fn into_parts(self) -> (Parts, Option<Bytes>) {
        self.inner.into_parts()
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// The target url, including the query string if any.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// The body bytes, `None` when the request carries no body at all.
    pub fn body(&self) -> Option<&Bytes> {
        self.inner.body().as_ref()
    }
}

impl From<Request<Option<Bytes>>> for BuiltRequest {
    #[inline]
    fn from(inner: Request<Option<Bytes>>) -> Self {
        Self { inner }
    }
}

/// Whether requests with this method conventionally carry a body.
///
/// Returns false for methods whose parameters belong in the url:
/// - GET
/// - HEAD
/// - DELETE
/// - OPTIONS
/// - CONNECT
/// - TRACE
pub fn carries_body(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::DELETE | Method::OPTIONS | Method::CONNECT | Method::TRACE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::ACCEPT;

    #[test]
    fn bodyless_methods() {
        for method in [Method::GET, Method::HEAD, Method::DELETE, Method::OPTIONS, Method::CONNECT, Method::TRACE] {
            assert!(!carries_body(&method), "{method} should not carry a body");
        }

        for method in [Method::POST, Method::PUT, Method::PATCH] {
            assert!(carries_body(&method), "{method} should carry a body");
        }

        assert!(carries_body(&Method::from_bytes(b"PURGE").unwrap()));
    }

    #[test]
    fn accessors_expose_inner_request() {
        let request: BuiltRequest = Request::builder()
            .method(Method::POST)
            .uri("http://127.0.0.1:8080/users?page=2")
            .header(ACCEPT, "application/json")
            .body(Some(Bytes::from_static(b"{}")))
            .unwrap()
            .into();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().path(), "/users");
        assert_eq!(request.uri().query(), Some("page=2"));
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");
        assert_eq!(request.body(), Some(&Bytes::from_static(b"{}")));

        let (parts, body) = request.into_parts();
        assert_eq!(parts.method, Method::POST);
        assert_eq!(body, Some(Bytes::from_static(b"{}")));
    }
}
