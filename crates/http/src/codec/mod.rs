//! HTTP/1.1 client codec used by the default transport
//!
//! - [`RequestEncoder`]: serializes a [`BuiltRequest`](crate::protocol::BuiltRequest)
//! - [`ResponseDecoder`]: decodes the response head, then its payload
//!
//! Both plug into tokio-util's `FramedWrite` / `FramedRead`.

mod body;
mod header;
mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
