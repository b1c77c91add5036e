//! A minimal HTTP/1.1 transport over plain TCP.
//!
//! Opens one connection per request and asks the server to close it once the
//! response is written. Only `http://` urls are supported.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use http::{HeaderValue, Response, header};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, trace};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::ensure;
use crate::protocol::{BuiltRequest, Message, ParseError, PayloadItem, RawResponse, TransportError};
use crate::transport::Transport;

const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct TcpTransport {
    timeout: Option<Duration>,
    read_buffer_capacity: usize,
    max_body_bytes: usize,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TcpTransportBuilder {
        TcpTransportBuilder::new()
    }

    async fn round_trip(&self, request: BuiltRequest) -> Result<RawResponse, TransportError> {
        let uri = request.uri();
        match uri.scheme_str() {
            Some("http") => {}
            Some(scheme) => return Err(TransportError::unsupported_scheme(scheme)),
            None => return Err(TransportError::invalid_request("uri has no scheme")),
        }

        let authority = uri.authority().ok_or_else(|| TransportError::invalid_request("uri has no authority"))?.clone();
        let method = request.method().clone();
        debug!(%method, %uri, "sending request");

        let host = authority.host().trim_start_matches('[').trim_end_matches(']');
        let stream = TcpStream::connect((host, authority.port_u16().unwrap_or(80)))
            .await
            .map_err(|e| TransportError::connect(&authority, e))?;
        let (reader, writer) = stream.into_split();

        let mut framed_write = FramedWrite::new(writer, RequestEncoder::new());
        framed_write.send(connection_close(request)).await?;

        let mut framed_read = FramedRead::with_capacity(reader, ResponseDecoder::new(&method), self.read_buffer_capacity);

        let head = match framed_read.next().await {
            Some(Ok(Message::Header((head, payload_size)))) => {
                trace!(status = head.status().as_u16(), ?payload_size, "received response head");
                head
            }
            Some(Ok(Message::Payload(_))) => {
                error!("received payload before the response head");
                return Err(ParseError::invalid_body("payload before the response head").into());
            }
            Some(Err(e)) => return Err(e.into()),
            None => return Err(TransportError::Closed),
        };

        let mut body = BytesMut::new();
        loop {
            match framed_read.next().await {
                Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                    ensure!(
                        body.len() + bytes.len() <= self.max_body_bytes,
                        ParseError::TooLargeBody { max_size: self.max_body_bytes }.into()
                    );
                    body.extend_from_slice(&bytes);
                }
                Some(Ok(Message::Payload(PayloadItem::Eof))) => break,
                Some(Ok(Message::Header(_))) => {
                    error!("received a second response head");
                    return Err(ParseError::invalid_header("unexpected response head").into());
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TransportError::Closed),
            }
        }

        debug!(status = head.status().as_u16(), body_size = body.len(), "received response");
        let (parts, ()) = head.into_parts();
        Ok(Response::from_parts(parts, body.freeze()))
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse, TransportError> {
        let Some(timeout) = self.timeout else {
            return self.round_trip(request).await;
        };

        match tokio::time::timeout(timeout, self.round_trip(request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::Timeout(timeout)),
        }
    }
}

fn connection_close(request: BuiltRequest) -> BuiltRequest {
    let mut inner = request.into_inner();
    inner.headers_mut().insert(header::CONNECTION, HeaderValue::from_static("close"));
    BuiltRequest::from(inner)
}

#[derive(Debug)]
pub struct TcpTransportBuilder {
    timeout: Option<Duration>,
    read_buffer_capacity: usize,
    max_body_bytes: usize,
}

impl TcpTransportBuilder {
    fn new() -> Self {
        Self { timeout: None, read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY, max_body_bytes: DEFAULT_MAX_BODY_BYTES }
    }

    /// Limits the whole round-trip, connect included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    /// Responses with a larger payload fail with `ParseError::TooLargeBody`.
    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn build(self) -> TcpTransport {
        TcpTransport {
            timeout: self.timeout,
            read_buffer_capacity: self.read_buffer_capacity,
            max_body_bytes: self.max_body_bytes,
        }
    }
}
