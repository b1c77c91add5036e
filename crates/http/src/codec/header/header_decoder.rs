//! HTTP response head decoder
//!
//! Parses the status line and header fields of a response with `httparse` and
//! decides how the payload that follows is framed.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1 responses are accepted

use bytes::{Buf, BytesMut};
use http::{HeaderName, HeaderValue, Response, StatusCode, header};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, ResponseHead};

/// Maximum number of headers allowed in a response
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for response heads implementing the [`Decoder`] trait.
///
/// `head_request` must be set when the response answers a `HEAD` request, such
/// a response never has a payload whatever its headers say.
#[derive(Debug)]
pub struct HeaderDecoder {
    head_request: bool,
}

impl HeaderDecoder {
    pub fn new(head_request: bool) -> Self {
        Self { head_request }
    }
}

impl Decoder for HeaderDecoder {
    type Item = (ResponseHead, PayloadSize);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        match parse_head(src)? {
            Some((head, body_offset)) => {
                trace!(header_size = body_offset, status = head.status().as_u16(), "parsed response head");
                src.advance(body_offset);
                let payload_size = parse_payload(&head, self.head_request)?;
                Ok(Some((head, payload_size)))
            }
            None => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                Ok(None)
            }
        }
    }
}

/// Parses a complete head out of `src`, returning it together with the offset
/// of the first payload byte, `None` if the head is still partial.
fn parse_head(src: &[u8]) -> Result<Option<(ResponseHead, usize)>, ParseError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
    let mut resp = httparse::Response::new(&mut headers);

    let status = resp.parse(src).map_err(|e| match e {
        Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
        e => ParseError::invalid_header(e.to_string()),
    })?;

    let body_offset = match status {
        Status::Complete(body_offset) => body_offset,
        Status::Partial => return Ok(None),
    };

    ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

    let version = match resp.version {
        Some(0) => http::Version::HTTP_10,
        Some(1) => http::Version::HTTP_11,
        _ => return Err(ParseError::InvalidVersion(resp.version)),
    };

    let status = resp
        .code
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or(ParseError::InvalidStatus(resp.code))?;

    let mut head = Response::new(());
    *head.status_mut() = status;
    *head.version_mut() = version;

    let header_map = head.headers_mut();
    header_map.reserve(resp.headers.len());
    for header in resp.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
        header_map.append(name, value);
    }

    Ok(Some((head, body_offset)))
}

/// Determines how the payload is framed, following RFC 9112 section 6.3.
fn parse_payload(head: &ResponseHead, head_request: bool) -> Result<PayloadSize, ParseError> {
    let status = head.status();
    if head_request || status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED
    {
        return Ok(PayloadSize::Empty);
    }

    let te_header = head.headers().get(header::TRANSFER_ENCODING);
    let cl_header = head.headers().get(header::CONTENT_LENGTH);

    match (te_header, cl_header) {
        (None, None) => Ok(PayloadSize::UntilClose),

        (Some(te_value), None) => {
            if is_chunked(te_value) {
                Ok(PayloadSize::Chunked)
            } else {
                Ok(PayloadSize::UntilClose)
            }
        }

        (None, Some(cl_value)) => {
            let length = cl_value
                .to_str()
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok())
                .ok_or_else(|| ParseError::invalid_content_length(format!("value {cl_value:?} is not u64")))?;
            Ok(PayloadSize::Length(length))
        }

        (Some(_), Some(_)) => {
            Err(ParseError::invalid_content_length("transfer-encoding and content-length both present in response"))
        }
    }
}

/// `chunked` must be the final transfer coding for the payload to be chunk framed.
fn is_chunked(value: &HeaderValue) -> bool {
    value
        .to_str()
        .ok()
        .and_then(|codings| codings.rsplit(',').next())
        .is_some_and(|last| last.trim().eq_ignore_ascii_case("chunked"))
}
