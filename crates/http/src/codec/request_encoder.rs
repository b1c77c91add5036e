use crate::codec::header::HeaderEncoder;
use crate::protocol::{BuiltRequest, PayloadSize, TransportError};
use bytes::BytesMut;
use tokio_util::codec::Encoder;

/// Encodes a whole [`BuiltRequest`], head and body, into HTTP/1.1 bytes.
#[derive(Debug)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<BuiltRequest> for RequestEncoder {
    type Error = TransportError;

    fn encode(&mut self, item: BuiltRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = item.into_parts();

        let payload_size = match &body {
            Some(bytes) => PayloadSize::Length(bytes.len() as u64),
            None => PayloadSize::Empty,
        };

        self.header_encoder.encode((parts, payload_size), dst)?;

        if let Some(bytes) = body {
            dst.extend_from_slice(&bytes);
        }
        Ok(())
    }
}
