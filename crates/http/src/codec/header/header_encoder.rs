//! Serializes the head of an outbound HTTP/1.1 request
//!
//! Writes the request line in origin-form, a `host` header derived from the
//! uri authority when the caller did not set one, and keeps the
//! `content-length` header in line with the payload that follows.

use std::fmt::Write;

use bytes::{BufMut, BytesMut};
use http::request::Parts;
use http::{HeaderValue, Version, header};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{PayloadSize, TransportError, carries_body};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for request heads implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<(Parts, PayloadSize)> for HeaderEncoder {
    type Error = TransportError;

    fn encode(&mut self, item: (Parts, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut parts, payload_size) = item;

        if parts.version != Version::HTTP_11 {
            error!(http_version = ?parts.version, "unsupported http version");
            return Err(TransportError::invalid_request(format!("unsupported http version {:?}", parts.version)));
        }

        let target = parts.uri.path_and_query().map_or("/", |path_and_query| path_and_query.as_str());

        dst.reserve(INIT_HEADER_SIZE);
        write!(dst, "{} {} HTTP/1.1\r\n", parts.method, target).map_err(TransportError::invalid_request)?;

        if !parts.headers.contains_key(header::HOST) {
            let authority = parts.uri.authority().ok_or_else(|| TransportError::invalid_request("uri has no authority"))?;
            let host = HeaderValue::from_str(authority.as_str()).map_err(TransportError::invalid_request)?;
            parts.headers.insert(header::HOST, host);
        }

        match payload_size {
            PayloadSize::Length(n) => {
                parts.headers.insert(header::CONTENT_LENGTH, n.into());
            }
            PayloadSize::Empty if carries_body(&parts.method) => {
                const ZERO_VALUE: HeaderValue = HeaderValue::from_static("0");
                parts.headers.insert(header::CONTENT_LENGTH, ZERO_VALUE);
            }
            PayloadSize::Empty => {
                parts.headers.remove(header::CONTENT_LENGTH);
            }
            PayloadSize::Chunked | PayloadSize::UntilClose => {
                return Err(TransportError::invalid_request("request bodies must have a known length"));
            }
        }

        for (header_name, header_value) in &parts.headers {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
